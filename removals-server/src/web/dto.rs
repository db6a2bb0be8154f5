//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire, matching the booking form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BookingDetails, LocationDetails, Postcode};

/// Request to quote a route between two postcodes.
#[derive(Debug, Deserialize)]
pub struct CalculatePriceRequest {
    /// Pickup postcode
    pub origin: String,

    /// Dropoff postcode
    pub destination: String,
}

/// Response for a route quote.
#[derive(Debug, Serialize)]
pub struct CalculatePriceResponse {
    /// Great-circle distance in whole kilometers
    pub distance: u32,

    /// Quoted price, 2-decimal string
    pub price: String,
}

/// Request to confirm a booking. Everything except the order id and
/// timestamp, which the ledger assigns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingRequest {
    pub move_date: NaiveDate,
    pub pickup_postcode: String,
    pub pickup_type: String,
    pub pickup_floor: u32,
    pub pickup_elevator: bool,
    pub pickup_parking: bool,
    pub dropoff_postcode: String,
    pub dropoff_type: String,
    pub dropoff_floor: u32,
    pub dropoff_elevator: bool,
    pub dropoff_parking: bool,
    pub bedrooms: i64,
    pub house_size: String,
    pub item_piano: bool,
    pub item_pool: bool,
    pub item_art: bool,
    pub multiple_locations: bool,
    #[serde(default)]
    pub notes: String,
    pub final_price: f64,
    pub paid: bool,
}

impl SubmitBookingRequest {
    /// Validate the request and build the domain booking details.
    ///
    /// Returns a user-facing message for anything the customer can
    /// correct (blank postcode, negative bedroom count).
    pub fn try_into_details(self) -> Result<BookingDetails, String> {
        let pickup_postcode = Postcode::parse(&self.pickup_postcode)
            .map_err(|e| format!("pickup postcode: {e}"))?;
        let dropoff_postcode = Postcode::parse(&self.dropoff_postcode)
            .map_err(|e| format!("dropoff postcode: {e}"))?;

        let bedrooms = u32::try_from(self.bedrooms)
            .map_err(|_| "bedrooms must be a non-negative integer".to_string())?;

        if !self.final_price.is_finite() || self.final_price < 0.0 {
            return Err("final price must be a non-negative number".to_string());
        }

        Ok(BookingDetails {
            move_date: self.move_date,
            pickup: LocationDetails {
                postcode: pickup_postcode,
                property_type: self.pickup_type,
                floor: self.pickup_floor,
                elevator: self.pickup_elevator,
                parking: self.pickup_parking,
            },
            dropoff: LocationDetails {
                postcode: dropoff_postcode,
                property_type: self.dropoff_type,
                floor: self.dropoff_floor,
                elevator: self.dropoff_elevator,
                parking: self.dropoff_parking,
            },
            bedrooms,
            house_size: self.house_size,
            item_piano: self.item_piano,
            item_pool: self.item_pool,
            item_art: self.item_art,
            multiple_locations: self.multiple_locations,
            notes: self.notes,
            final_price: self.final_price,
            paid: self.paid,
        })
    }
}

/// Response for a confirmed booking.
#[derive(Debug, Serialize)]
pub struct SubmitBookingResponse {
    /// Confirmation message naming the assigned order id
    pub message: String,
}

/// Query for the live postcode validation check.
#[derive(Debug, Deserialize)]
pub struct ValidatePostcodeRequest {
    pub postcode: String,
}

/// Response for the live postcode validation check.
#[derive(Debug, Serialize)]
pub struct ValidatePostcodeResponse {
    pub result: bool,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

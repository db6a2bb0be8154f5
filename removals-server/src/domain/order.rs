//! Booking order types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::postcode::Postcode;

/// A unique, durable booking order identifier.
///
/// Ids are positive, strictly increasing in assignment order, and
/// never reused, even across process restarts. Only the order ledger
/// assigns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access details for one side of the move (pickup or dropoff).
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetails {
    pub postcode: Postcode,

    /// Property type as chosen on the form (e.g. "flat", "house").
    pub property_type: String,

    pub floor: u32,
    pub elevator: bool,
    pub parking: bool,
}

/// Everything the customer supplies when confirming a booking.
///
/// The final price is client-supplied and recorded as-is; the server
/// does not recompute it at confirmation time.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub move_date: NaiveDate,
    pub pickup: LocationDetails,
    pub dropoff: LocationDetails,
    pub bedrooms: u32,
    pub house_size: String,
    pub item_piano: bool,
    pub item_pool: bool,
    pub item_art: bool,
    pub multiple_locations: bool,
    pub notes: String,
    pub final_price: f64,
    pub paid: bool,
}

/// A confirmed booking as persisted by the ledger.
///
/// Created exactly once at confirmation time; never mutated or
/// deleted. The id and timestamp are assigned by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingOrder {
    pub id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub details: BookingDetails,
}

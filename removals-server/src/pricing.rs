//! Quote pricing strategies.
//!
//! Two independent formulas exist and are both kept as named
//! strategies, since callers invoke them at different steps of the
//! booking flow:
//!
//! - [`route_quote`]: the initial quick quote from distance alone.
//!   The distance is rounded to the nearest whole kilometer before
//!   pricing.
//! - [`booking_quote`]: the full quote once the bedroom count is
//!   known. The distance is kept at one-decimal precision.
//!
//! The rounding asymmetry between the two is inherited from the
//! product's booking flow and is intentional; do not unify it without
//! stakeholder confirmation.

/// Per-kilometer rate for the quick route quote.
pub const ROUTE_RATE_PER_KM: f64 = 1.2;

/// Flat base charge for a confirmed booking quote.
pub const BOOKING_BASE_PRICE: f64 = 200.0;

/// Per-bedroom charge for a confirmed booking quote.
pub const BOOKING_PRICE_PER_BEDROOM: f64 = 50.0;

/// Per-kilometer rate for a confirmed booking quote.
pub const BOOKING_RATE_PER_KM: f64 = 1.0;

/// Error returned for pricing input that violates the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid attribute: {reason}")]
pub struct InvalidAttribute {
    reason: &'static str,
}

/// A derived price quote. Not persisted; recomputed on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    /// Distance in kilometers, rounded per the strategy's policy.
    pub distance_km: f64,

    /// Quoted price, carried at 2-decimal precision. Never negative.
    pub price: f64,
}

impl PriceQuote {
    /// Render the price as a 2-decimal string (e.g. `"314.40"`).
    pub fn price_string(&self) -> String {
        format!("{:.2}", self.price)
    }
}

fn check_distance(distance_km: f64) -> Result<f64, InvalidAttribute> {
    if !distance_km.is_finite() {
        return Err(InvalidAttribute {
            reason: "distance must be finite",
        });
    }
    if distance_km < 0.0 {
        return Err(InvalidAttribute {
            reason: "distance must be non-negative",
        });
    }
    Ok(distance_km)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Quick route quote: `round(km) × 1.2`, rounded to 2 decimals.
pub fn route_quote(distance_km: f64) -> Result<PriceQuote, InvalidAttribute> {
    let distance = check_distance(distance_km)?.round();
    let price = round2(distance * ROUTE_RATE_PER_KM).max(0.0);
    Ok(PriceQuote {
        distance_km: distance,
        price,
    })
}

/// Booking quote: `200 + bedrooms × 50 + km × 1.0`, with the distance
/// at one-decimal precision and the price rounded to 2 decimals.
pub fn booking_quote(distance_km: f64, bedrooms: u32) -> Result<PriceQuote, InvalidAttribute> {
    let distance = (check_distance(distance_km)? * 10.0).round() / 10.0;
    let price = BOOKING_BASE_PRICE
        + f64::from(bedrooms) * BOOKING_PRICE_PER_BEDROOM
        + distance * BOOKING_RATE_PER_KM;
    Ok(PriceQuote {
        distance_km: distance,
        price: round2(price).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_quote_reference_vector() {
        // 262 km at 1.2/km
        let quote = route_quote(262.0).unwrap();
        assert_eq!(quote.distance_km, 262.0);
        assert_eq!(quote.price_string(), "314.40");
    }

    #[test]
    fn route_quote_rounds_distance_first() {
        // 261.7 km rounds to 262 before pricing
        let quote = route_quote(261.7).unwrap();
        assert_eq!(quote.distance_km, 262.0);
        assert_eq!(quote.price_string(), "314.40");

        // 261.4 km rounds down to 261
        let quote = route_quote(261.4).unwrap();
        assert_eq!(quote.distance_km, 261.0);
        assert_eq!(quote.price_string(), "313.20");
    }

    #[test]
    fn booking_quote_reference_vector() {
        // 200 + 3×50 + 26.2 = 376.20
        let quote = booking_quote(26.2, 3).unwrap();
        assert_eq!(quote.distance_km, 26.2);
        assert_eq!(quote.price_string(), "376.20");
    }

    #[test]
    fn booking_quote_keeps_one_decimal_distance() {
        let quote = booking_quote(26.24, 3).unwrap();
        assert_eq!(quote.distance_km, 26.2);

        let quote = booking_quote(26.25, 3).unwrap();
        assert_eq!(quote.distance_km, 26.3);
    }

    #[test]
    fn zero_distance_is_not_negative() {
        let quote = route_quote(0.0).unwrap();
        assert_eq!(quote.price, 0.0);

        // The booking formula still charges the base price
        let quote = booking_quote(0.0, 0).unwrap();
        assert_eq!(quote.price_string(), "200.00");
    }

    #[test]
    fn reject_degenerate_distance() {
        assert!(route_quote(-1.0).is_err());
        assert!(route_quote(f64::NAN).is_err());
        assert!(route_quote(f64::INFINITY).is_err());
        assert!(booking_quote(-0.1, 2).is_err());
        assert!(booking_quote(f64::NAN, 2).is_err());
    }
}

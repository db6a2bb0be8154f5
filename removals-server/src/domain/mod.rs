//! Domain types for the removals server.
//!
//! Core value types with their invariants enforced at construction
//! time, so code that receives these types can trust their validity.

mod coordinate;
mod order;
mod postcode;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinate, distance_km};
pub use order::{BookingDetails, BookingOrder, LocationDetails, OrderId};
pub use postcode::{InvalidPostcode, Postcode};

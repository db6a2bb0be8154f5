//! Postcode geocoding.
//!
//! Client for the external postcodes.io-style provider: full
//! resolution to coordinates, plus a cheaper validation-only check.

mod client;
mod error;

pub use client::{GeocodeConfig, PostcodeClient};
pub use error::GeocodeError;

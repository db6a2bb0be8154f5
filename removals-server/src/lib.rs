//! Removals quoting and booking server.
//!
//! Quotes a price for a relocation job between two postcodes and
//! records confirmed bookings in a durable append-only ledger with
//! crash-recoverable sequential order ids.

pub mod domain;
pub mod geocode;
pub mod ledger;
pub mod pricing;
pub mod web;

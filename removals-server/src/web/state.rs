//! Application state for the web layer.

use std::sync::Arc;

use crate::geocode::PostcodeClient;
use crate::ledger::OrderLedger;

/// Shared application state.
///
/// Contains the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Geocoding provider client
    pub geocoder: Arc<PostcodeClient>,

    /// Durable order ledger
    pub ledger: Arc<OrderLedger>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(geocoder: PostcodeClient, ledger: OrderLedger) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            ledger: Arc::new(ledger),
        }
    }
}

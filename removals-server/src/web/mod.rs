//! Web layer for the removals server.
//!
//! Provides the quote and booking endpoints and serves the form's
//! static assets.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;

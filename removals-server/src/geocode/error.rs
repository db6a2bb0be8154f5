//! Geocoding provider error types.

/// Errors that can occur when resolving a postcode.
///
/// `NotFound` is user-correctable and callers map it to a 4xx; the
/// remaining variants are provider failures and map to 5xx.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider does not know this postcode
    #[error("postcode not found")]
    NotFound,

    /// The provider returned an unexpected error status
    #[error("provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider's response body
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

//! Postcode geocoding HTTP client.
//!
//! Talks to a postcodes.io-style provider. The client interprets the
//! provider's response; it does not validate postcode format itself
//! and performs no retries, leaving retry policy to the caller.

use reqwest::Url;
use serde::Deserialize;

use crate::domain::{Coordinate, Postcode};

use super::error::GeocodeError;

/// Default base URL for the geocoding provider.
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Lookup response body: `{ status, result: { latitude, longitude } }`.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: u16,
    result: Option<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Validation response body: `{ result: bool }`.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    result: bool,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Base URL for the provider
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl GeocodeConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the postcode geocoding provider.
#[derive(Debug, Clone)]
pub struct PostcodeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PostcodeClient {
    /// Create a new geocoding client.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| GeocodeError::Api {
            status: 0,
            message: format!("invalid base URL: {e}"),
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Build `{base}/postcodes/{code}[/suffix]`, percent-encoding the
    /// postcode as a path segment.
    fn endpoint(&self, postcode: &Postcode, suffix: Option<&str>) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| GeocodeError::Api {
                status: 0,
                message: "base URL cannot have path segments".to_string(),
            })?;
            segments
                .pop_if_empty()
                .push("postcodes")
                .push(postcode.as_str());
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    /// Resolve a postcode to coordinates.
    ///
    /// A provider 404 or a body with `status != 200` means the
    /// postcode does not exist (`NotFound`); transport and decode
    /// failures are reported separately so callers can treat them as
    /// retryable provider errors.
    pub async fn resolve(&self, postcode: &Postcode) -> Result<Coordinate, GeocodeError> {
        let url = self.endpoint(postcode, None)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GeocodeError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: LookupResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        if parsed.status != 200 {
            return Err(GeocodeError::NotFound);
        }

        let result = parsed.result.ok_or_else(|| GeocodeError::Json {
            message: "missing result object".to_string(),
        })?;

        let (latitude, longitude) = match (result.latitude, result.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(GeocodeError::Json {
                    message: "missing latitude or longitude".to_string(),
                });
            }
        };

        Coordinate::new(latitude, longitude).map_err(|e| GeocodeError::Api {
            status: status.as_u16(),
            message: format!("provider returned {e}"),
        })
    }

    /// Check whether a postcode exists, without resolving coordinates.
    ///
    /// A cheaper existence check used for live field feedback. A
    /// provider 404 here means "invalid postcode", not an error.
    pub async fn validate(&self, postcode: &Postcode) -> Result<bool, GeocodeError> {
        let url = self.endpoint(postcode, Some("validate"))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: ValidateResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        Ok(parsed.result)
    }
}

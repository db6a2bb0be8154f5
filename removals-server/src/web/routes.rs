//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::domain::{Postcode, distance_km};
use crate::geocode::GeocodeError;
use crate::ledger::LedgerError;
use crate::pricing;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `static_dir` is the path to the booking form's static assets,
/// served for any path the API does not claim.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calculate-price", post(calculate_price))
        .route("/submit-booking", post(submit_booking))
        .route("/validate-postcode", get(validate_postcode))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Quote a route between two postcodes. Nothing is persisted.
async fn calculate_price(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CalculatePriceResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: CalculatePriceRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(body = %String::from_utf8_lossy(&body), "bad quote request: {e}");
        AppError::BadRequest {
            message: "Origin and destination required".to_string(),
        }
    })?;

    let origin = Postcode::parse(&req.origin).map_err(|_| AppError::BadRequest {
        message: "Origin and destination required".to_string(),
    })?;
    let destination = Postcode::parse(&req.destination).map_err(|_| AppError::BadRequest {
        message: "Origin and destination required".to_string(),
    })?;

    // Both lookups in flight together; both must land before pricing.
    let (origin_coord, dest_coord) = tokio::join!(
        state.geocoder.resolve(&origin),
        state.geocoder.resolve(&destination)
    );
    let origin_coord = origin_coord.map_err(AppError::from)?;
    let dest_coord = dest_coord.map_err(AppError::from)?;

    let distance = distance_km(origin_coord, dest_coord);
    let quote = pricing::route_quote(distance).map_err(|e| AppError::Internal {
        message: format!("Server error calculating distance: {e}"),
    })?;

    Ok(Json(CalculatePriceResponse {
        distance: quote.distance_km as u32,
        price: quote.price_string(),
    }))
}

/// Confirm a booking: assign the next order id and append the record.
///
/// The client-supplied final price is recorded as-is; see the ledger
/// docs for the server-side verification gap.
async fn submit_booking(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitBookingResponse>, AppError> {
    let req: SubmitBookingRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(body = %String::from_utf8_lossy(&body), "bad booking request: {e}");
        AppError::BadRequest {
            message: format!("Invalid booking: {e}"),
        }
    })?;

    let details = req
        .try_into_details()
        .map_err(|message| AppError::BadRequest { message })?;

    let order = state.ledger.append(details).await.map_err(AppError::from)?;

    tracing::info!(order_id = order.id.0, "booking recorded");

    Ok(Json(SubmitBookingResponse {
        message: format!("Booking received! Order ID: {}", order.id),
    }))
}

/// Live existence check for a single postcode field.
async fn validate_postcode(
    State(state): State<AppState>,
    Query(req): Query<ValidatePostcodeRequest>,
) -> Result<Json<ValidatePostcodeResponse>, AppError> {
    let postcode = match Postcode::parse(&req.postcode) {
        Ok(pc) => pc,
        // A blank field is simply not a valid postcode
        Err(_) => return Ok(Json(ValidatePostcodeResponse { result: false })),
    };

    let result = state
        .geocoder
        .validate(&postcode)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Server error validating postcode: {e}"),
        })?;

    Ok(Json(ValidatePostcodeResponse { result }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            // Unresolvable postcode is the customer's to correct
            GeocodeError::NotFound => AppError::BadRequest {
                message: "Invalid origin or destination postcode.".to_string(),
            },
            other => AppError::Internal {
                message: format!("Server error calculating distance: {other}"),
            },
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        AppError::Internal {
            message: format!("Failed to save booking: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::error!(status = %status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

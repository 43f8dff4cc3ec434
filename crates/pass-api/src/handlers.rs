//! # Request Handlers
//!
//! Axum request handlers for checkout creation, the Stripe webhook and
//! access-token validation.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pass_core::{AccessNotification, PassError, WebhookEventType};
use pass_stripe::SIGNATURE_HEADER;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Customer email (required, prefilled at checkout)
    #[serde(default)]
    pub email: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckoutResponse {
    /// Session ID, later used as the access token
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Token validation query
#[derive(Debug, Deserialize)]
pub struct ValidateTokenQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Token validation result
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenValidity {
    pub valid: bool,
}

fn error_response(err: PassError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn webhook_error(err: PassError) -> Response {
    (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", err)).into_response()
}

/// Provider session IDs are `[A-Za-z0-9_]+`; anything else never reaches the provider
fn looks_like_session_id(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 255
        && token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dex-pass",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a checkout session for the product
#[instrument(skip_all)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = payload.map_err(|rejection| {
        error_response(PassError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    })?;

    let email = request
        .0
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| error_response(PassError::Validation("Missing email".to_string())))?;

    let checkout = state.checkout_request(email);

    info!(
        "Creating checkout: product={}, price={}",
        checkout.product.name,
        checkout.product.price.display()
    );

    let session = state
        .provider
        .create_checkout(&checkout)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            error_response(e)
        })?;

    Ok(Json(CreateCheckoutResponse { id: session.id }))
}

/// Handle Stripe webhook
///
/// Always acknowledges once the signature checks out; mail delivery happens
/// in the background and never affects the response.
#[instrument(skip_all)]
pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        warn!("Webhook rejected: missing signature header");
        return webhook_error(PassError::Authentication(
            "No stripe-signature header value was provided.".to_string(),
        ));
    };

    let event = match state.provider.verify_webhook(&body, signature) {
        Ok(event) => event,
        Err(e) => {
            warn!("Webhook signature invalid: {}", e);
            return webhook_error(e);
        }
    };

    info!(
        "Received webhook: type={:?}, id={}, created={}",
        event.event_type,
        event.event_id,
        event
            .created
            .map(|created| created.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    );

    match (&event.event_type, event.checkout) {
        (WebhookEventType::CheckoutSessionCompleted, Some(checkout)) => {
            match checkout.customer_email {
                Some(email) => {
                    info!("Checkout completed: session={}", checkout.session_id);
                    state
                        .notifications
                        .dispatch(AccessNotification::new(email, checkout.session_id));
                }
                None => warn!(
                    "Checkout completed without a payer email: session={}",
                    checkout.session_id
                ),
            }
        }
        (event_type, _) => debug!("Ignoring webhook event: {:?}", event_type),
    }

    Json(WebhookAck { received: true }).into_response()
}

/// Report whether the token is a paid checkout session
///
/// Every failure collapses to `valid: false`; callers learn nothing about why.
#[instrument(skip_all)]
pub async fn validate_token(
    State(state): State<AppState>,
    query: Result<Query<ValidateTokenQuery>, QueryRejection>,
) -> Json<TokenValidity> {
    let token = match query {
        Ok(Query(query)) => query.token,
        Err(rejection) => {
            debug!("Malformed token query: {}", rejection.body_text());
            None
        }
    };

    let Some(token) = token.filter(|t| looks_like_session_id(t)) else {
        return Json(TokenValidity { valid: false });
    };

    let valid = match state.provider.retrieve_session(&token).await {
        Ok(session) => session.is_paid(),
        Err(e) => {
            warn!("Token lookup failed: {}", e);
            false
        }
    };

    Json(TokenValidity { valid })
}

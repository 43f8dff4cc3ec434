//! # Stripe Webhook Verification
//!
//! Verifies the `Stripe-Signature` header against the raw request body and
//! decodes the event. The HMAC is computed over the exact bytes received.
//! Only the fields dex-pass acts on are read; the rest of the event may take
//! any shape.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use pass_core::{CompletedCheckout, PassError, PassResult, WebhookEvent, WebhookEventType};
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header Stripe signs webhooks with
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Verify `payload` against `header` and decode the event, using the current time.
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> PassResult<WebhookEvent> {
    construct_event_at(payload, header, secret, tolerance_secs, Utc::now().timestamp())
}

/// Same as [`construct_event`] with an explicit clock.
pub fn construct_event_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> PassResult<WebhookEvent> {
    let sig_parts = parse_signature_header(header)?;

    let expected_sig = compute_signature(secret, sig_parts.timestamp, payload);
    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(PassError::Authentication(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    // Only stale signatures are rejected; clocks ahead of ours are tolerated
    if now.saturating_sub(sig_parts.timestamp) > tolerance_secs {
        return Err(PassError::Authentication(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    let event: Value = serde_json::from_slice(payload).map_err(|e| {
        PassError::Authentication(format!("Failed to parse webhook payload: {}", e))
    })?;

    let event_type = WebhookEventType::from_provider(
        event.get("type").and_then(Value::as_str).unwrap_or_default(),
    );
    debug!("Verified Stripe webhook: type={:?}", event_type);

    let checkout = match event_type {
        WebhookEventType::CheckoutSessionCompleted => Some(completed_checkout(
            event.get("data").and_then(|data| data.get("object")),
        )?),
        WebhookEventType::Other(_) => None,
    };

    Ok(WebhookEvent {
        event_id: event
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        event_type,
        checkout,
        created: event
            .get("created")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

/// Build a `Stripe-Signature` header value for `payload`.
///
/// Useful for local tooling and tests that need a correctly signed request.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        compute_signature(secret, timestamp, payload)
    )
}

/// Pull the session ID and payer email out of a checkout session object
fn completed_checkout(object: Option<&Value>) -> PassResult<CompletedCheckout> {
    let session_id = object
        .and_then(|o| o.get("id"))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| PassError::Authentication("Missing session id in event".to_string()))?;

    let customer_email = object
        .and_then(|o| o.get("customer_email"))
        .and_then(Value::as_str)
        .or_else(|| {
            object
                .and_then(|o| o.get("customer_details"))
                .and_then(|cd| cd.get("email"))
                .and_then(Value::as_str)
        })
        .filter(|email| !email.is_empty())
        .map(String::from);

    Ok(CompletedCheckout {
        session_id,
        customer_email,
    })
}

// =============================================================================
// Signature Verification
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PassResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PassError::Authentication("Unable to extract timestamp from header".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PassError::Authentication(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Hex HMAC-SHA256 of `"{timestamp}." ++ payload`
fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    // HMAC accepts keys of any length
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() || b.is_empty() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

//! # Routes
//!
//! Axum router configuration for dex-pass.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
/// - POST /create-checkout-session - Create checkout, returns `{ id }`
/// - POST /webhook                 - Stripe webhook (raw body)
/// - GET  /validate-token          - `{ valid }` for an access token
/// - GET  /health                  - Health check
///
/// CORS admits only the configured static site.
pub fn create_router(state: AppState) -> Router {
    let cors = match state.config.allowed_origin() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin]))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            warn!("{}; cross-origin requests will be refused", e);
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/create-checkout-session", post(handlers::create_checkout_session))
        .route("/webhook", post(handlers::webhook))
        .route("/validate-token", get(handlers::validate_token))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::NotificationDispatcher;
    use crate::state::AppConfig;
    use axum::body::Bytes;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use pass_core::{AccessNotification, Product};
    use pass_stripe::{signature_header, StripeConfig, StripeProvider};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WEBHOOK_SECRET: &str = "whsec_test_secret";
    const ORIGIN: &str = "https://dex.example.com";

    struct Harness {
        server: TestServer,
        stripe: MockServer,
        notifications: UnboundedReceiver<AccessNotification>,
    }

    async fn harness() -> Harness {
        let stripe = MockServer::start().await;
        let provider = StripeProvider::new(
            StripeConfig::new("sk_test_abc123", WEBHOOK_SECRET).with_api_base_url(stripe.uri()),
        )
        .unwrap();

        let (dispatcher, notifications) = NotificationDispatcher::channel();
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_site: ORIGIN.to_string(),
            environment: "test".to_string(),
        };
        let state = AppState::new(config, Arc::new(provider), dispatcher, Product::default());

        Harness {
            server: TestServer::new(create_router(state)).unwrap(),
            stripe,
            notifications,
        }
    }

    fn signed(payload: &Value, secret: &str) -> (Bytes, HeaderValue) {
        let body = serde_json::to_vec(payload).unwrap();
        let header = signature_header(secret, chrono::Utc::now().timestamp(), &body);
        (Bytes::from(body), HeaderValue::from_str(&header).unwrap())
    }

    fn event(event_type: &str, object: Value) -> Value {
        json!({
            "id": "evt_test_1",
            "type": event_type,
            "created": chrono::Utc::now().timestamp(),
            "data": { "object": object }
        })
    }

    async fn post_webhook(h: &Harness, body: Bytes, signature: HeaderValue) -> axum_test::TestResponse {
        h.server
            .post("/webhook")
            .bytes(body)
            .add_header(HeaderName::from_static("stripe-signature"), signature)
            .await
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_checkout_returns_provider_session_id() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_123",
                "url": "https://checkout.stripe.com/c/pay/cs_123",
                "payment_status": "unpaid"
            })))
            .expect(1)
            .mount(&h.stripe)
            .await;

        let response = h
            .server
            .post("/create-checkout-session")
            .json(&json!({ "email": "a@b.com" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "id": "cs_123" }));
    }

    #[tokio::test]
    async fn test_checkout_without_email_is_rejected() {
        let h = harness().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&h.stripe)
            .await;

        for body in [json!({}), json!({ "email": "" }), json!({ "email": "   " })] {
            let response = h.server.post("/create-checkout-session").json(&body).await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert!(response.json::<Value>()["error"].is_string());
        }

        let response = h
            .server
            .post("/create-checkout-session")
            .text("email=a@b.com")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_checkout_upstream_failure() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Invalid API Key provided" }
            })))
            .mount(&h.stripe)
            .await;

        let response = h
            .server
            .post("/create-checkout-session")
            .json(&json!({ "email": "a@b.com" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Invalid API Key provided" })
        );
    }

    // -------------------------------------------------------------------------
    // Webhook
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_completed_event_notifies_once() {
        let mut h = harness().await;
        let (body, signature) = signed(
            &event(
                "checkout.session.completed",
                json!({ "id": "cs_paid_1", "customer_email": "ash@example.com", "payment_status": "paid" }),
            ),
            WEBHOOK_SECRET,
        );

        let response = post_webhook(&h, body, signature).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "received": true }));
        assert_eq!(
            h.notifications.try_recv().unwrap(),
            AccessNotification::new("ash@example.com", "cs_paid_1")
        );
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_signature_rejected() {
        let mut h = harness().await;
        let (body, signature) = signed(
            &event(
                "checkout.session.completed",
                json!({ "id": "cs_paid_1", "customer_email": "ash@example.com" }),
            ),
            "whsec_forged",
        );

        let response = post_webhook(&h, body, signature).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().starts_with("Webhook Error: "));
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_signature_rejected() {
        let mut h = harness().await;
        let body = serde_json::to_vec(&event(
            "checkout.session.completed",
            json!({ "id": "cs_paid_1", "customer_email": "ash@example.com" }),
        ))
        .unwrap();

        let response = h.server.post("/webhook").bytes(Bytes::from(body)).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("stripe-signature"));
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_other_events_acknowledged_and_ignored() {
        let mut h = harness().await;
        let (body, signature) = signed(
            &event("payment_intent.succeeded", json!({ "id": "pi_1" })),
            WEBHOOK_SECRET,
        );

        let response = post_webhook(&h, body, signature).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "received": true }));
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signed_event_of_unfamiliar_shape_acknowledged() {
        let mut h = harness().await;
        let (body, signature) = signed(
            &json!({ "id": "evt_thin", "type": "v1.billing.meter.no_meter_found", "created": "2024-01-01T00:00:00.000Z" }),
            WEBHOOK_SECRET,
        );

        let response = post_webhook(&h, body, signature).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "received": true }));
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_completed_event_without_email_acknowledged() {
        let mut h = harness().await;
        let (body, signature) = signed(
            &event("checkout.session.completed", json!({ "id": "cs_paid_2" })),
            WEBHOOK_SECRET,
        );

        let response = post_webhook(&h, body, signature).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(h.notifications.try_recv().is_err());
    }

    // -------------------------------------------------------------------------
    // Token validation
    // -------------------------------------------------------------------------

    async fn mount_session(stripe: &MockServer, id: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/checkout/sessions/{}", id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(stripe)
            .await;
    }

    async fn validate(h: &Harness, token: Option<&str>) -> Value {
        let mut request = h.server.get("/validate-token");
        if let Some(token) = token {
            request = request.add_query_param("token", token);
        }
        let response = request.await;
        assert_eq!(response.status_code(), StatusCode::OK);
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_validate_token() {
        let h = harness().await;
        mount_session(
            &h.stripe,
            "cs_paid",
            200,
            json!({ "id": "cs_paid", "payment_status": "paid" }),
        )
        .await;
        mount_session(
            &h.stripe,
            "cs_unpaid",
            200,
            json!({ "id": "cs_unpaid", "payment_status": "unpaid" }),
        )
        .await;
        mount_session(
            &h.stripe,
            "cs_missing",
            404,
            json!({ "error": { "message": "No such checkout.session: 'cs_missing'" } }),
        )
        .await;

        assert_eq!(validate(&h, None).await, json!({ "valid": false }));
        assert_eq!(validate(&h, Some("")).await, json!({ "valid": false }));
        assert_eq!(validate(&h, Some("cs_paid")).await, json!({ "valid": true }));
        assert_eq!(validate(&h, Some("cs_unpaid")).await, json!({ "valid": false }));
        assert_eq!(validate(&h, Some("cs_missing")).await, json!({ "valid": false }));
    }

    #[tokio::test]
    async fn test_malformed_token_never_reaches_provider() {
        let h = harness().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&h.stripe)
            .await;

        assert_eq!(
            validate(&h, Some("cs_1/../customers")).await,
            json!({ "valid": false })
        );
    }

    // -------------------------------------------------------------------------
    // CORS
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cors_allows_only_static_site() {
        let h = harness().await;

        let allowed = h
            .server
            .get("/validate-token")
            .add_header(header::ORIGIN, HeaderValue::from_static(ORIGIN))
            .await;
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ORIGIN))
        );

        let foreign = h
            .server
            .get("/validate-token")
            .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
            .await;
        assert!(foreign
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness().await;
        let response = h.server.get("/health").await;
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }
}

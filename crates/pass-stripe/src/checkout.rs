//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API: create a hosted
//! checkout for the product and read a session back by ID.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use pass_core::{
    CheckoutRequest, CheckoutSession, PassError, PassResult, PaymentProvider, WebhookEvent,
};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout provider
///
/// Uses Stripe's hosted checkout page; card data never touches dex-pass.
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PassResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PassError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PassResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form body for `POST /v1/checkout/sessions`
    fn checkout_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
        let price = &request.product.price;

        vec![
            ("payment_method_types[0]", "card".to_string()),
            (
                "line_items[0][price_data][currency]",
                price.currency.as_str().to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.product.name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                price.amount.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("mode", "payment".to_string()),
            ("customer_email", request.customer_email.clone()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
        ]
    }

    /// `{base}/v1/checkout/sessions/{id}` with the ID encoded as a single path segment
    fn session_url(&self, session_id: &str) -> PassResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| PassError::Configuration(format!("Invalid Stripe API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PassError::Configuration("Stripe API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "checkout", "sessions", session_id]);
        Ok(url)
    }

    /// Read the body and turn a non-2xx into an upstream error
    async fn read_session(response: Response) -> PassResult<CheckoutSession> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PassError::upstream(PROVIDER, e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PassError::upstream(PROVIDER, error_response.error.message));
            }

            return Err(PassError::upstream(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            PassError::upstream(PROVIDER, format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, request))]
    async fn create_checkout(&self, request: &CheckoutRequest) -> PassResult<CheckoutSession> {
        let form = Self::checkout_form(request);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        debug!(
            "Creating Stripe checkout session: product={}, price={}",
            request.product.name,
            request.product.price.display()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await
            .map_err(|e| PassError::upstream(PROVIDER, e.to_string()))?;

        let session = Self::read_session(response).await?;

        info!(
            "Created Stripe checkout session: id={}, url={:?}",
            session.id, session.url
        );

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> PassResult<CheckoutSession> {
        let url = self.session_url(session_id)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| PassError::upstream(PROVIDER, e.to_string()))?;

        let session = Self::read_session(response).await?;
        debug!(
            "Retrieved Stripe checkout session: id={}, payment_status={:?}",
            session.id, session.payment_status
        );

        Ok(session)
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PassResult<WebhookEvent> {
        webhook::construct_event(
            payload,
            signature,
            &self.config.webhook_secret,
            self.config.webhook_tolerance_secs,
        )
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

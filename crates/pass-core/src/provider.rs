//! # Payment Provider Trait
//!
//! Seam between the HTTP layer and the payment provider.
//! The only implementation is Stripe; tests stand in their own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentProvider (trait)                   │
//! │  ├── create_checkout()                                      │
//! │  ├── retrieve_session()                                     │
//! │  ├── verify_webhook()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ StripeProvider│
//!                    └───────────────┘
//! ```

use crate::error::PassResult;
use crate::session::{CheckoutRequest, CheckoutSession, WebhookEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations dex-pass delegates to the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// # Returns
    /// The new session; its `id` is handed back to the browser.
    async fn create_checkout(&self, request: &CheckoutRequest) -> PassResult<CheckoutSession>;

    /// Look up a session by identifier.
    async fn retrieve_session(&self, session_id: &str) -> PassResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes, exactly as received
    /// * `signature` - Signature header from the request
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PassResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

//! # Checkout Session Types
//!
//! Checkout sessions and webhook events. Sessions are owned by the payment
//! provider; dex-pass only ever holds a transient copy of one.

use crate::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment status reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds captured
    Paid,
    /// Awaiting payment
    Unpaid,
    /// Session completed without a charge (e.g. 100% discount)
    NoPaymentRequired,
    /// Anything the provider adds later
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

/// Everything needed to open a hosted checkout for the product
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Payer email, prefilled on the hosted page
    pub customer_email: String,

    /// The SKU being bought (quantity 1)
    pub product: Product,

    /// Redirect after payment; may carry the provider's session placeholder
    pub success_url: String,

    /// Redirect if the customer backs out
    pub cancel_url: String,
}

/// A checkout session as reported by the payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID, doubles as the access token
    pub id: String,

    /// Payer email, if the provider knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Current payment status
    pub payment_status: PaymentStatus,

    /// Hosted checkout URL (only present while the session is open)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.is_paid()
    }
}

/// Webhook event types dex-pass distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// `checkout.session.completed`
    CheckoutSessionCompleted,
    /// Anything else, acknowledged and ignored
    Other(String),
}

impl WebhookEventType {
    pub fn from_provider(event_type: &str) -> Self {
        match event_type {
            "checkout.session.completed" => WebhookEventType::CheckoutSessionCompleted,
            other => WebhookEventType::Other(other.to_string()),
        }
    }
}

/// Session details carried by a completed-checkout event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub customer_email: Option<String>,
}

/// A verified webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Set for `CheckoutSessionCompleted` events
    pub checkout: Option<CompletedCheckout>,

    /// When the provider created the event, if it said so in a form we read
    pub created: Option<DateTime<Utc>>,
}

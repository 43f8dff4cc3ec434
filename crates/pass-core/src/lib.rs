//! # pass-core
//!
//! Core types and traits for dex-pass.
//!
//! This crate provides:
//! - `PaymentProvider` trait implemented by the Stripe client
//! - `Notifier` trait implemented by the mail relay client
//! - `Product`, `CheckoutRequest`, `CheckoutSession` and `WebhookEvent`
//! - `SiteUrls` for redirect and access links
//! - `PassError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pass_core::{CheckoutRequest, PaymentProvider, Product, SiteUrls};
//!
//! let urls = SiteUrls::new("https://dex.example.com");
//! let request = CheckoutRequest {
//!     customer_email: "ash@example.com".into(),
//!     product: Product::default(),
//!     success_url: urls.success_url_with_session(),
//!     cancel_url: urls.cancel_url(),
//! };
//!
//! let session = provider.create_checkout(&request).await?;
//! // Hand session.id to the browser
//! ```

pub mod error;
pub mod notify;
pub mod product;
pub mod provider;
pub mod session;
pub mod site;

// Re-exports for convenience
pub use error::{PassError, PassResult};
pub use notify::{AccessNotification, BoxedNotifier, Notifier};
pub use product::{Currency, Price, Product};
pub use provider::{BoxedPaymentProvider, PaymentProvider};
pub use session::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentStatus, WebhookEvent,
    WebhookEventType,
};
pub use site::{SiteUrls, ACCESS_TOKEN_PARAM, SESSION_ID_PLACEHOLDER};

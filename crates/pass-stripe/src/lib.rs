//! # pass-stripe
//!
//! Stripe payment provider for dex-pass.
//!
//! - **StripeProvider**: Checkout Sessions API (create + retrieve) and
//!   webhook verification behind the `PaymentProvider` trait
//! - **webhook**: `Stripe-Signature` verification over the raw body
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pass_stripe::StripeProvider;
//! use pass_core::PaymentProvider;
//!
//! let provider = StripeProvider::from_env()?;
//! let session = provider.create_checkout(&request).await?;
//!
//! // Later, from the access page:
//! let paid = provider.retrieve_session(&session.id).await?.is_paid();
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! let event = provider.verify_webhook(&body, signature)?;
//! if let Some(checkout) = event.checkout {
//!     // send the access link
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeProvider;
pub use config::StripeConfig;
pub use webhook::{construct_event, signature_header, SIGNATURE_HEADER};

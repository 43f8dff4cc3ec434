//! # pass-api
//!
//! HTTP API layer for dex-pass.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout creation and access-token validation endpoints
//! - The Stripe webhook handler and the supervisor that sends access emails
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | POST | `/webhook` | Stripe webhook |
//! | GET | `/validate-token` | Check an access token |

pub mod dispatch;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dispatch::NotificationDispatcher;
pub use routes::create_router;
pub use state::{AppConfig, AppState};

//! # pass-mail
//!
//! Access-link delivery for dex-pass.
//!
//! `SmtpNotifier` implements `pass_core::Notifier` on top of an
//! authenticated SMTP relay (Gmail by default).
//!
//! ```rust,ignore
//! use pass_core::{AccessNotification, Notifier, SiteUrls};
//! use pass_mail::SmtpNotifier;
//!
//! let notifier = SmtpNotifier::from_env(SiteUrls::new("https://dex.example.com"))?;
//! notifier
//!     .send_access_link(&AccessNotification::new("ash@example.com", "cs_test_1"))
//!     .await?;
//! ```

pub mod config;
pub mod smtp;
pub mod template;

pub use config::MailConfig;
pub use smtp::SmtpNotifier;
pub use template::{AccessEmail, ACCESS_SUBJECT};

//! # Mail Configuration
//!
//! SMTP relay credentials and sender identity, loaded from the environment.

use pass_core::PassError;
use std::env;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_FROM_NAME: &str = "PokéBinderDex";

/// Mail relay configuration
#[derive(Clone)]
pub struct MailConfig {
    /// Relay host (implicit TLS)
    pub smtp_host: String,

    /// Relay port; `None` keeps the relay default (465)
    pub smtp_port: Option<u16>,

    /// Account name, also used as the sender address
    pub username: String,

    /// Account password or app password
    pub password: String,

    /// Display name on the `From` header
    pub from_name: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `EMAIL_USER`
    /// - `EMAIL_PASS`
    ///
    /// Optional:
    /// - `SMTP_HOST` (default `smtp.gmail.com`)
    /// - `SMTP_PORT`
    /// - `MAIL_FROM_NAME`
    pub fn from_env() -> Result<Self, PassError> {
        dotenvy::dotenv().ok();

        let username = env::var("EMAIL_USER")
            .map_err(|_| PassError::Configuration("EMAIL_USER not set".to_string()))?;
        let password = env::var("EMAIL_PASS")
            .map_err(|_| PassError::Configuration("EMAIL_PASS not set".to_string()))?;

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(port) => Some(port.parse().map_err(|_| {
                PassError::Configuration(format!("SMTP_PORT is not a valid port: {}", port))
            })?),
            Err(_) => None,
        };

        let mut config = Self::new(username, password);
        config.smtp_port = smtp_port;
        if let Ok(host) = env::var("SMTP_HOST") {
            config.smtp_host = host;
        }
        if let Ok(name) = env::var("MAIL_FROM_NAME") {
            config.from_name = name;
        }

        Ok(config)
    }

    /// Create config with explicit credentials and default relay
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: None,
            username: username.into(),
            password: password.into(),
            from_name: DEFAULT_FROM_NAME.to_string(),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_name", &self.from_name)
            .finish()
    }
}

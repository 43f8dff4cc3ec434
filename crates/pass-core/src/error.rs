//! # Error Types
//!
//! Typed error handling for dex-pass.
//! All fallible operations return `Result<T, PassError>`.

use thiserror::Error;

/// Core error type for dex-pass
#[derive(Debug, Error)]
pub enum PassError {
    /// Bad or missing input (client's fault)
    #[error("{0}")]
    Validation(String),

    /// Webhook signature, header or payload rejected
    #[error("{0}")]
    Authentication(String),

    /// Payment provider or mail relay failure
    #[error("{message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// Start-up configuration errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PassError {
    /// Shorthand for an upstream failure of `service`
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        PassError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PassError::Validation(_) => 400,
            PassError::Authentication(_) => 400,
            PassError::Upstream { .. } => 500,
            PassError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for dex-pass operations
pub type PassResult<T> = Result<T, PassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PassError::Validation("missing".into()).status_code(), 400);
        assert_eq!(PassError::Authentication("bad sig".into()).status_code(), 400);
        assert_eq!(PassError::upstream("stripe", "boom").status_code(), 500);
    }

    #[test]
    fn test_upstream_displays_provider_message() {
        let err = PassError::upstream("stripe", "Invalid API Key provided");
        assert_eq!(err.to_string(), "Invalid API Key provided");
    }
}

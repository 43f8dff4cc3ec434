//! # Site URLs
//!
//! Links into the static front-end: checkout redirects and the access link.

/// Placeholder Stripe substitutes with the finalized session ID at redirect time
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Query parameter the access page reads its token from
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// URLs of the static site that fronts dex-pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    /// Origin of the static site (e.g., "https://dex.example.com")
    pub base_url: String,

    /// Page that validates the access token
    pub access_path: String,

    /// Page shown when the customer cancels checkout
    pub cancel_path: String,
}

impl SiteUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_path: "/TESTPAY.html".to_string(),
            cancel_path: "/payment-cancel.html".to_string(),
        }
    }

    /// Access link for a known token
    pub fn access_link(&self, token: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.base_url, self.access_path, ACCESS_TOKEN_PARAM, token
        )
    }

    /// Success redirect handed to the provider, token left as placeholder
    pub fn success_url_with_session(&self) -> String {
        self.access_link(SESSION_ID_PLACEHOLDER)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

//! Access-link email content.

/// Subject line of the access email
pub const ACCESS_SUBJECT: &str = "Your PersonalizedDex Access";

/// Plain-text access email for one purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEmail {
    pub link: String,
}

impl AccessEmail {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }

    pub fn subject(&self) -> &'static str {
        ACCESS_SUBJECT
    }

    /// Validity is enforced by the session expiry on the provider side
    pub fn text_body(&self) -> String {
        format!(
            "Thanks for your PersonalizedDex purchase!\n\n\
             Here's your access link in case you close the tab by mistake:\n\n\
             {}\n\n\
             ⚠️ The link will remain valid only for a few minutes!",
            self.link
        )
    }
}

//! # SMTP Notifier
//!
//! Sends the access-link email through an authenticated SMTP relay.

use crate::config::MailConfig;
use crate::template::AccessEmail;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use pass_core::{AccessNotification, Notifier, PassError, PassResult, SiteUrls};
use tracing::{info, instrument};

const SERVICE: &str = "smtp";

/// `Notifier` backed by an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    urls: SiteUrls,
}

impl SmtpNotifier {
    /// Build the relay transport. No connection is opened until the first send.
    pub fn new(config: MailConfig, urls: SiteUrls) -> PassResult<Self> {
        let address: Address = config.username.parse().map_err(|e| {
            PassError::Configuration(format!("EMAIL_USER is not a valid address: {}", e))
        })?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| {
                PassError::Configuration(format!(
                    "Invalid SMTP relay {}: {}",
                    config.smtp_host, e
                ))
            })?
            .credentials(Credentials::new(config.username, config.password));

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            urls,
        })
    }

    /// Create from environment variables
    pub fn from_env(urls: SiteUrls) -> PassResult<Self> {
        Self::new(MailConfig::from_env()?, urls)
    }

    /// Render the access email for one notification
    pub fn build_message(&self, notification: &AccessNotification) -> PassResult<Message> {
        let to: Mailbox = notification.recipient.parse().map_err(|e| {
            PassError::Validation(format!(
                "Invalid recipient address {}: {}",
                notification.recipient, e
            ))
        })?;

        let email = AccessEmail::new(self.urls.access_link(&notification.token));

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body())
            .map_err(|e| PassError::Validation(format!("Failed to build access email: {}", e)))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, notification), fields(recipient = %notification.recipient))]
    async fn send_access_link(&self, notification: &AccessNotification) -> PassResult<()> {
        let message = self.build_message(notification)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| PassError::upstream(SERVICE, e.to_string()))?;

        info!("Access email sent: code={}", response.code());
        Ok(())
    }
}

//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at start-up from the environment and cloned into each handler.

use crate::dispatch::NotificationDispatcher;
use axum::http::HeaderValue;
use pass_core::{
    BoxedNotifier, BoxedPaymentProvider, CheckoutRequest, PassError, PassResult, Product,
    SiteUrls,
};
use pass_mail::SmtpNotifier;
use pass_stripe::StripeProvider;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origin of the static site; the only origin allowed by CORS
    pub static_site: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> PassResult<Self> {
        dotenvy::dotenv().ok();

        let static_site = std::env::var("STATIC_SITE")
            .map_err(|_| PassError::Configuration("STATIC_SITE not set".to_string()))?;

        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().map_err(|_| {
                PassError::Configuration(format!("PORT is not a valid port: {}", p))
            })?,
            Err(_) => 8080,
        };

        let config = Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            static_site: static_site.trim_end_matches('/').to_string(),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        };

        config.allowed_origin()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> PassResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| PassError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// `STATIC_SITE` as an `Access-Control-Allow-Origin` value
    pub fn allowed_origin(&self) -> PassResult<HeaderValue> {
        HeaderValue::from_str(&self.static_site)
            .map_err(|e| PassError::Configuration(format!("STATIC_SITE is not a valid origin: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider (Stripe)
    pub provider: BoxedPaymentProvider,
    /// Hand-off to the notification supervisor
    pub notifications: NotificationDispatcher,
    /// The SKU sold at checkout
    pub product: Product,
    /// Static site links
    pub urls: SiteUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        provider: BoxedPaymentProvider,
        notifications: NotificationDispatcher,
        product: Product,
    ) -> Self {
        Self {
            provider,
            notifications,
            product,
            urls: SiteUrls::new(&config.static_site),
            config,
        }
    }

    /// Build state from the environment and start the notification supervisor.
    ///
    /// The returned handle finishes after the last clone of the state is dropped.
    pub fn from_env() -> anyhow::Result<(Self, JoinHandle<()>)> {
        let config = AppConfig::from_env()?;
        let urls = SiteUrls::new(&config.static_site);

        let stripe = StripeProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        if stripe.config().is_test_mode() {
            tracing::info!("Stripe mode: test (no real charges)");
        } else {
            tracing::warn!("Stripe mode: LIVE");
        }
        let provider: BoxedPaymentProvider = Arc::new(stripe);
        let notifier: BoxedNotifier = Arc::new(
            SmtpNotifier::from_env(urls)
                .map_err(|e| anyhow::anyhow!("Failed to initialize mail relay: {}", e))?,
        );

        let product = load_product()?;
        let (notifications, supervisor) = NotificationDispatcher::spawn(notifier);

        Ok((Self::new(config, provider, notifications, product), supervisor))
    }

    /// Checkout request for `email` with the site's redirect URLs
    pub fn checkout_request(&self, email: impl Into<String>) -> CheckoutRequest {
        CheckoutRequest {
            customer_email: email.into(),
            product: self.product.clone(),
            success_url: self.urls.success_url_with_session(),
            cancel_url: self.urls.cancel_url(),
        }
    }
}

/// Load the product from config file, falling back to the default SKU
fn load_product() -> anyhow::Result<Product> {
    let config_paths = [
        "config/product.toml",
        "../config/product.toml",
        "../../config/product.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let product = Product::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded product '{}' from {}", product.name, path);
            return Ok(product);
        }
    }

    tracing::warn!("No product config found, using default product");
    Ok(Product::default())
}

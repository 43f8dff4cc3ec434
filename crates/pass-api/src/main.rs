//! # dex-pass
//!
//! One-time payment broker for the PersonalizedDex static site.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export EMAIL_USER=shop@example.com
//! export EMAIL_PASS=...
//! export STATIC_SITE=https://dex.example.com
//!
//! # Run the server
//! dex-pass
//! ```

use pass_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let (state, supervisor) = AppState::from_env()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!(
        "Product: {} ({})",
        state.product.name,
        state.product.price.display()
    );
    info!("Payment provider: {}", state.provider.provider_name());
    info!("Allowed origin: {}", state.config.static_site);

    if !state.config.is_production() {
        info!("💳 Checkout: POST http://{}/create-checkout-session", addr);
        info!("🔔 Webhook: POST http://{}/webhook", addr);
        info!("🔑 Validate: GET http://{}/validate-token?token=...", addr);
    }

    let app = routes::create_router(state);

    info!("🚀 dex-pass listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last dispatcher; wait for in-flight emails
    info!("Draining pending access emails");
    supervisor.await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  🎫 dex-pass 🎫
  ━━━━━━━━━━━━━━━━━━━━━━━
  One-time access broker
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

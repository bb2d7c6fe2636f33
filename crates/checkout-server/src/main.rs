//! Braintree demo checkout server
//!
//! Axum server rendering the Drop-in checkout form and transaction result
//! pages, plus a small JSON API over the same gateway.

mod flash;
mod handlers;
mod pages;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::PaymentGateway;
use checkout_gateway::{BraintreeGateway, MockGateway};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize gateway
    let gateway: Arc<dyn PaymentGateway> = match BraintreeGateway::from_env() {
        Ok(braintree) => {
            tracing::info!(
                environment = braintree.config().environment.graphql_url(),
                "✓ Braintree configured"
            );
            Arc::new(braintree)
        }
        Err(e) => {
            tracing::warn!("⚠ Braintree not configured ({}) - using mock gateway", e);
            tracing::warn!("  Set BT_MERCHANT_ID, BT_PUBLIC_KEY and BT_PRIVATE_KEY in .env");
            Arc::new(MockGateway::new())
        }
    };

    if gateway.health_check().await {
        tracing::info!("✓ Connected to {}", gateway.name());
    } else {
        tracing::warn!("⚠ {} not reachable - checkouts will fail", gateway.name());
    }

    // Build application state
    let mut state = AppState::new(gateway);
    if let Ok(id) = std::env::var("CUSTOMER_SEARCH_ID") {
        state = state.with_customer_search_id(id);
    }

    let app = routes::router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /checkouts/new          - Checkout form");
    tracing::info!("  POST /checkouts              - Run a sale");
    tracing::info!("  GET  /checkouts/{{id}}         - Transaction result");
    tracing::info!("  GET  /client_token           - Drop-in client token");
    tracing::info!("  POST /post_checkout          - Sale (JSON)");
    tracing::info!("  POST /post_checkout_transact - Sale with customer data (JSON)");
    tracing::info!("  POST /all_merchants          - List merchant accounts");
    tracing::info!("  POST /create_merchant        - Create merchant account");
    tracing::info!("  POST /all_customers          - Search customers");
    tracing::info!("  POST /create_customer        - Create customer");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}

//! Application startup and lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware::from_fn;
use axum::{
    routing::{get, patch, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{http_request_span, request_id_middleware},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{PortalConfig, StoreBackend};
use crate::handlers;
use crate::services::{KeyValueStore, MemoryStore, PortalState, RedisStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub portal: PortalState,
    pub config: PortalConfig,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/notices", get(handlers::list_notices))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        // Gateways
        .route("/gateways", get(handlers::gateways::list_gateways))
        .route(
            "/gateways/:id",
            get(handlers::gateways::get_gateway).patch(handlers::gateways::update_gateway),
        )
        .route("/gateways/:id/toggle", post(handlers::gateways::toggle_gateway))
        .route("/gateways/:id/test", post(handlers::gateways::test_gateway))
        // Webhooks
        .route(
            "/webhooks",
            get(handlers::webhooks::list_webhooks).post(handlers::webhooks::create_webhook),
        )
        .route("/webhooks/secret", post(handlers::webhooks::new_secret))
        .route("/webhooks/deliveries", get(handlers::webhooks::list_deliveries))
        .route(
            "/webhooks/:id",
            patch(handlers::webhooks::update_webhook).delete(handlers::webhooks::delete_webhook),
        )
        .route("/webhooks/:id/toggle", post(handlers::webhooks::toggle_webhook))
        // Transactions and payments
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/gateways",
            get(handlers::transactions::list_transaction_gateways),
        )
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction)
                .patch(handlers::transactions::update_transaction),
        )
        .route("/payments", post(handlers::transactions::process_payment))
        // Payouts
        .route(
            "/payouts",
            get(handlers::payouts::list_payouts).post(handlers::payouts::create_payout),
        )
        .route("/payouts/:id", patch(handlers::payouts::update_payout))
        .route(
            "/payouts/:id/status",
            post(handlers::payouts::update_payout_status),
        )
        // Accounts
        .route(
            "/users",
            get(handlers::accounts::list_users).post(handlers::accounts::create_user),
        )
        .route(
            "/users/:id",
            patch(handlers::accounts::update_user).delete(handlers::accounts::delete_user),
        )
        .route(
            "/managers",
            get(handlers::accounts::list_managers).post(handlers::accounts::create_manager),
        )
        .route(
            "/managers/:id",
            patch(handlers::accounts::update_manager).delete(handlers::accounts::delete_manager),
        )
        .route(
            "/merchants",
            get(handlers::accounts::list_merchants).post(handlers::accounts::create_merchant),
        )
        .route(
            "/merchants/:id",
            patch(handlers::accounts::update_merchant)
                .delete(handlers::accounts::delete_merchant),
        )
        .route("/merchants/:id/kyc", post(handlers::accounts::submit_kyc))
        // Commission and referrals
        .route(
            "/commission",
            get(handlers::commission::get_commission).put(handlers::commission::update_commission),
        )
        .route("/commission/quote", get(handlers::commission::quote_commission))
        .route(
            "/referrals",
            get(handlers::referrals::list_referrals).post(handlers::referrals::create_referral),
        )
        .route("/referrals/:id", patch(handlers::referrals::update_referral))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span))
        .with_state(state)
}

async fn connect_store(config: &PortalConfig) -> Result<Arc<dyn KeyValueStore>, AppError> {
    match config.storage.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; state is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => {
            let url = config.storage.redis_url.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("PORTAL_REDIS_URL is required for the redis backend"))
            })?;
            let store = RedisStore::connect(url.expose_secret(), &config.storage.key_prefix)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to Redis store");
                    AppError::from(e)
                })?;
            Ok(Arc::new(store))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the store named in `config`.
    pub async fn build(config: PortalConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Build the application on an existing store. Port 0 binds a random port.
    pub async fn build_with_store(
        config: PortalConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AppError> {
        let portal = PortalState::load(store, config.simulation.settings()).await?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %config.service_name, port, "Portal service bound");

        Ok(Self {
            port,
            listener,
            state: AppState { portal, config },
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

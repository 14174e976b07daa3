use portal_service::{config::PortalConfig, services::init_metrics, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration - fail fast if invalid
    let config = PortalConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage.backend,
        "Starting portal service"
    );

    let application = Application::build(config).await?;
    tracing::info!(port = application.port(), "Listening");
    application.run_until_stopped().await?;

    Ok(())
}

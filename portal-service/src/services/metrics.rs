use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use crate::models::TransactionStatus;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("failed to set metrics handle: already initialized"))
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record a settled simulated payment, labelled by status only.
pub fn record_payment(status: TransactionStatus, amount: f64) {
    counter!("portal_payments_total", "status" => status.as_str()).increment(1);
    histogram!("portal_payment_amount", "status" => status.as_str()).record(amount);
}

pub fn record_webhook_delivery(event: &str) {
    counter!("portal_webhook_deliveries_total", "event" => event.to_string()).increment(1);
}

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use service_core::error::AppError;

use super::collection::Collection;
use super::notifier::{Notice, Notifier};
use crate::models::{GatewayPatch, PaymentGateway};

pub const GATEWAYS_KEY: &str = "paymentGateways";

/// Outcome of a simulated credential check.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTest {
    pub gateway_id: String,
    pub success: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct GatewayService {
    gateways: Arc<Collection<PaymentGateway>>,
    notifier: Arc<dyn Notifier>,
    test_delay: Duration,
}

impl GatewayService {
    pub fn new(
        gateways: Arc<Collection<PaymentGateway>>,
        notifier: Arc<dyn Notifier>,
        test_delay: Duration,
    ) -> Self {
        Self {
            gateways,
            notifier,
            test_delay,
        }
    }

    pub async fn list(&self) -> Vec<PaymentGateway> {
        self.gateways.all().await
    }

    pub async fn get(&self, id: &str) -> Result<PaymentGateway, AppError> {
        self.gateways
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Gateway"))
    }

    pub async fn update(&self, id: &str, patch: GatewayPatch) -> Result<PaymentGateway, AppError> {
        let gateway = self
            .gateways
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Gateway"))?;

        tracing::info!(gateway_id = %id, name = %gateway.name, "Gateway updated");
        self.notifier.notify(Notice::info(
            "Gateway Updated",
            "Payment gateway settings have been updated successfully.",
        ));
        Ok(gateway)
    }

    /// Flip `isActive` and nothing else.
    pub async fn toggle_active(&self, id: &str) -> Result<PaymentGateway, AppError> {
        let gateway = self
            .gateways
            .modify(id, |gateway| gateway.is_active = !gateway.is_active)
            .await?
            .ok_or_else(|| AppError::not_found("Gateway"))?;

        let (title, verb) = if gateway.is_active {
            ("Gateway Activated", "activated")
        } else {
            ("Gateway Deactivated", "deactivated")
        };
        tracing::info!(gateway_id = %id, is_active = gateway.is_active, "Gateway toggled");
        self.notifier.notify(Notice::info(
            title,
            format!("{} has been {}.", gateway.name, verb),
        ));
        Ok(gateway)
    }

    /// Pretend to reach the processor: wait, then pass if the credentials
    /// the gateway family needs are all filled in.
    pub async fn test_connection(&self, id: &str) -> Result<ConnectionTest, AppError> {
        let gateway = self.get(id).await?;
        self.notifier.notify(Notice::info(
            "Testing Connection",
            format!("Connecting to {}...", gateway.name),
        ));

        tokio::time::sleep(self.test_delay).await;

        let success = gateway.credentials_complete();
        let result = if success {
            let message = format!("Successfully connected to {} API.", gateway.name);
            self.notifier
                .notify(Notice::info("Connection Successful", message.clone()));
            ConnectionTest {
                gateway_id: gateway.id,
                success,
                message,
            }
        } else {
            let message = "Please check your API credentials and try again.".to_string();
            self.notifier
                .notify(Notice::destructive("Connection Failed", message.clone()));
            ConnectionTest {
                gateway_id: gateway.id,
                success,
                message,
            }
        };

        tracing::info!(gateway_id = %id, success, "Gateway connection test finished");
        Ok(result)
    }
}

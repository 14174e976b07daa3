use std::sync::Arc;

use serde::Serialize;
use service_core::error::AppError;

use super::collection::Singleton;
use super::notifier::{Notice, Notifier};
use crate::models::CommissionSettings;

pub const COMMISSION_KEY: &str = "commissionSettings";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionQuote {
    pub gateway: String,
    pub amount: f64,
    pub percentage: f64,
    pub fixed_fee: f64,
    pub commission: f64,
    pub currency: String,
}

#[derive(Clone)]
pub struct CommissionService {
    settings: Arc<Singleton<CommissionSettings>>,
    notifier: Arc<dyn Notifier>,
}

impl CommissionService {
    pub fn new(settings: Arc<Singleton<CommissionSettings>>, notifier: Arc<dyn Notifier>) -> Self {
        Self { settings, notifier }
    }

    pub async fn get(&self) -> CommissionSettings {
        self.settings.get().await
    }

    /// Replace the settings as a whole.
    pub async fn update(&self, settings: CommissionSettings) -> Result<CommissionSettings, AppError> {
        let settings = self.settings.replace(settings).await?;

        tracing::info!(
            payu_percentage = settings.payu_percentage,
            platform_payments_percentage = settings.platform_payments_percentage,
            fixed_fee = settings.fixed_fee,
            "Commission settings updated"
        );
        self.notifier.notify(Notice::info(
            "Commissions Updated",
            "Commission settings have been saved successfully.",
        ));
        Ok(settings)
    }

    pub async fn quote(&self, gateway: &str, amount: f64) -> CommissionQuote {
        let settings = self.settings.get().await;
        CommissionQuote {
            gateway: gateway.to_string(),
            amount,
            percentage: settings.percentage_for(gateway),
            fixed_fee: settings.fixed_fee,
            commission: settings.commission_on(gateway, amount),
            currency: settings.default_currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::NoticeBoard;
    use crate::services::store::{KeyValueStore, MemoryStore};

    async fn service(store: Arc<dyn KeyValueStore>) -> CommissionService {
        let settings = Singleton::load(COMMISSION_KEY, store, CommissionSettings::default)
            .await
            .unwrap();
        CommissionService::new(Arc::new(settings), Arc::new(NoticeBoard::new(10)))
    }

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let svc = service(Arc::new(MemoryStore::new())).await;
        assert_eq!(svc.get().await, CommissionSettings::default());
    }

    #[tokio::test]
    async fn update_replaces_and_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let svc = service(store.clone()).await;
        let new_settings = CommissionSettings {
            payu_percentage: 1.5,
            platform_payments_percentage: 3.0,
            fixed_fee: 1.0,
            default_currency: "USD".into(),
        };
        svc.update(new_settings.clone()).await.unwrap();

        let reloaded = service(store).await;
        assert_eq!(reloaded.get().await, new_settings);
    }

    #[tokio::test]
    async fn quote_uses_gateway_rate() {
        let svc = service(Arc::new(MemoryStore::new())).await;
        let quote = svc.quote("PlatformPayments", 1000.0).await;
        assert_eq!(quote.percentage, 2.5);
        assert!((quote.commission - 25.30).abs() < 1e-9);
        assert_eq!(quote.currency, "INR");
    }
}

use std::sync::Arc;

use serde::Serialize;

use super::collection::Collection;
use crate::models::{PaymentGateway, Payout, PayoutStatus, Transaction, TransactionStatus, Webhook};

const RECENT_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_transactions: usize,
    pub successful_transactions: usize,
    /// Sum of completed amounts, two decimals.
    pub total_amount: String,
    pub pending_payouts: usize,
    pub active_webhooks: usize,
    pub active_gateways: usize,
    pub recent_transactions: Vec<Transaction>,
}

#[derive(Clone)]
pub struct DashboardService {
    gateways: Arc<Collection<PaymentGateway>>,
    webhooks: Arc<Collection<Webhook>>,
    transactions: Arc<Collection<Transaction>>,
    payouts: Arc<Collection<Payout>>,
}

impl DashboardService {
    pub fn new(
        gateways: Arc<Collection<PaymentGateway>>,
        webhooks: Arc<Collection<Webhook>>,
        transactions: Arc<Collection<Transaction>>,
        payouts: Arc<Collection<Payout>>,
    ) -> Self {
        Self {
            gateways,
            webhooks,
            transactions,
            payouts,
        }
    }

    pub async fn stats(&self) -> DashboardStats {
        let transactions = self.transactions.all().await;
        let completed: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Completed)
            .collect();
        let total_amount: f64 = completed.iter().map(|tx| tx.amount).sum();

        DashboardStats {
            total_transactions: transactions.len(),
            successful_transactions: completed.len(),
            total_amount: format!("{:.2}", total_amount),
            pending_payouts: self
                .payouts
                .all()
                .await
                .iter()
                .filter(|p| p.status == PayoutStatus::Pending)
                .count(),
            active_webhooks: self.webhooks.all().await.iter().filter(|w| w.is_active).count(),
            active_gateways: self.gateways.all().await.iter().filter(|g| g.is_active).count(),
            recent_transactions: transactions.iter().take(RECENT_TRANSACTIONS).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::collection::Placement;
    use crate::services::store::{KeyValueStore, MemoryStore};
    use chrono::Utc;

    fn tx(id: &str, status: TransactionStatus, amount: f64) -> Transaction {
        Transaction {
            id: id.into(),
            timestamp: Utc::now(),
            status,
            amount,
            currency: "INR".into(),
            gateway: "PayU".into(),
            customer_id: None,
            description: None,
            gateway_reference: None,
            completed_at: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn stats_count_completed_and_active() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let gateways = Collection::load("paymentGateways", store.clone(), PaymentGateway::defaults)
            .await
            .unwrap();
        let webhooks = Collection::load("webhooks", store.clone(), Vec::new).await.unwrap();
        let payouts = Collection::load("payouts", store.clone(), Vec::new).await.unwrap();
        let transactions = Collection::load("transactions", store, Vec::new).await.unwrap();

        transactions
            .insert(tx("a", TransactionStatus::Completed, 100.25), Placement::Front)
            .await
            .unwrap();
        transactions
            .insert(tx("b", TransactionStatus::Failed, 50.0), Placement::Front)
            .await
            .unwrap();
        for i in 0..5 {
            transactions
                .insert(
                    tx(&format!("c{}", i), TransactionStatus::Completed, 10.0),
                    Placement::Front,
                )
                .await
                .unwrap();
        }

        let svc = DashboardService::new(
            Arc::new(gateways),
            Arc::new(webhooks),
            Arc::new(transactions),
            Arc::new(payouts),
        );
        let stats = svc.stats().await;

        assert_eq!(stats.total_transactions, 7);
        assert_eq!(stats.successful_transactions, 6);
        assert_eq!(stats.total_amount, "150.25");
        assert_eq!(stats.active_gateways, 1);
        assert_eq!(stats.active_webhooks, 0);
        assert_eq!(stats.pending_payouts, 0);
        assert_eq!(stats.recent_transactions.len(), 5);
        assert_eq!(stats.recent_transactions[0].id, "c4");
    }
}

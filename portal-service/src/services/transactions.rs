//! Transactions and the simulated payment flow.
//!
//! A payment is recorded as `pending`, held for a fixed delay, then settled
//! by a weighted coin flip. Settlement runs on its own task so it finishes
//! even when the caller stops waiting.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use service_core::error::AppError;

use super::collection::{Collection, Placement};
use super::metrics::record_payment;
use super::notifier::{Notice, Notifier};
use super::webhooks::WebhookService;
use crate::models::webhook::{EVENT_PAYMENT_FAILED, EVENT_PAYMENT_SUCCESS};
use crate::models::{new_id, Transaction, TransactionPatch, TransactionStatus, WebhookEvent};

pub const TRANSACTIONS_KEY: &str = "transactions";

pub const DECLINE_MESSAGE: &str = "Payment declined by issuing bank";

/// Delay and approval odds of the simulated processor.
#[derive(Debug, Clone, Copy)]
pub struct PaymentSimulation {
    pub delay: Duration,
    /// Probability in `[0, 1]` that a payment is approved.
    pub success_rate: f64,
}

impl Default for PaymentSimulation {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2000),
            success_rate: 0.9,
        }
    }
}

impl PaymentSimulation {
    fn approves(&self) -> bool {
        rand::thread_rng().gen_bool(self.success_rate.clamp(0.0, 1.0))
    }
}

/// Fields of a new transaction; id, timestamp and status are assigned.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub amount: f64,
    pub currency: String,
    pub gateway: String,
    pub customer_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Search and filters for the transaction list. `all` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub gateway: Option<String>,
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn contains_ci(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                contains_ci(&tx.customer_id, &needle)
                    || contains_ci(&tx.description, &needle)
                    || contains_ci(&tx.gateway_reference, &needle)
            }
        };
        let matches_status = active_filter(&self.status).map_or(true, |s| tx.status.as_str() == s);
        let matches_gateway = active_filter(&self.gateway).map_or(true, |g| tx.gateway == g);

        matches_search && matches_status && matches_gateway
    }
}

/// `REF-` followed by eight upper-case base-36 characters.
pub fn gateway_reference() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();
    format!("REF-{}", suffix)
}

#[derive(Clone)]
pub struct TransactionService {
    transactions: Arc<Collection<Transaction>>,
    webhooks: WebhookService,
    notifier: Arc<dyn Notifier>,
    simulation: PaymentSimulation,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<Collection<Transaction>>,
        webhooks: WebhookService,
        notifier: Arc<dyn Notifier>,
        simulation: PaymentSimulation,
    ) -> Self {
        Self {
            transactions,
            webhooks,
            notifier,
            simulation,
        }
    }

    pub async fn list(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.transactions
            .all()
            .await
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Transaction, AppError> {
        self.transactions
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Transaction"))
    }

    /// Distinct gateway names seen on transactions, in first-seen order.
    pub async fn gateways(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tx in self.transactions.all().await {
            if !tx.gateway.is_empty() && !names.contains(&tx.gateway) {
                names.push(tx.gateway);
            }
        }
        names
    }

    /// Record a `pending` transaction, newest first. No notice is raised.
    pub async fn add(&self, new: NewTransaction) -> Result<Transaction, AppError> {
        let transaction = Transaction {
            id: new_id(),
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
            amount: new.amount,
            currency: new.currency,
            gateway: new.gateway,
            customer_id: new.customer_id,
            description: new.description,
            gateway_reference: None,
            completed_at: None,
            error: None,
        };

        tracing::info!(
            transaction_id = %transaction.id,
            amount = transaction.amount,
            currency = %transaction.currency,
            gateway = %transaction.gateway,
            "Creating transaction"
        );

        Ok(self.transactions.insert(transaction, Placement::Front).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction, AppError> {
        self.transactions
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction"))
    }

    /// Run a simulated payment to completion and report how it settled.
    pub async fn process_payment(&self, new: NewTransaction) -> Result<PaymentOutcome, AppError> {
        let transaction = self.add(new).await?;

        let service = self.clone();
        let handle = tokio::spawn(async move { service.settle(transaction).await });

        handle.await.map_err(|e| {
            tracing::error!(error = %e, "Payment settlement task failed");
            AppError::InternalError(anyhow::anyhow!("payment settlement task failed: {}", e))
        })
    }

    async fn settle(&self, transaction: Transaction) -> PaymentOutcome {
        tokio::time::sleep(self.simulation.delay).await;

        match self.record_outcome(&transaction).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                tracing::error!(
                    transaction_id = %transaction.id,
                    error = %message,
                    "Payment processing error"
                );
                let patch = TransactionPatch {
                    status: Some(TransactionStatus::Error),
                    error: Some(message.clone()),
                    completed_at: Some(Utc::now()),
                    ..Default::default()
                };
                if let Err(persist_err) = self.transactions.update(&transaction.id, patch).await {
                    tracing::error!(
                        transaction_id = %transaction.id,
                        error = %persist_err,
                        "Failed to persist payment error"
                    );
                }
                record_payment(TransactionStatus::Error, transaction.amount);
                self.notifier
                    .notify(Notice::destructive("Payment Error", message.clone()));
                PaymentOutcome {
                    success: false,
                    transaction_id: transaction.id,
                    error: Some(message),
                }
            }
        }
    }

    async fn record_outcome(&self, transaction: &Transaction) -> Result<PaymentOutcome, AppError> {
        let approved = self.simulation.approves();
        let now = Utc::now();

        let (patch, event, outcome) = if approved {
            (
                TransactionPatch {
                    status: Some(TransactionStatus::Completed),
                    gateway_reference: Some(gateway_reference()),
                    completed_at: Some(now),
                    ..Default::default()
                },
                WebhookEvent {
                    event: EVENT_PAYMENT_SUCCESS.to_string(),
                    data: serde_json::json!({
                        "transactionId": transaction.id,
                        "amount": transaction.amount,
                        "currency": transaction.currency,
                        "timestamp": now,
                    }),
                },
                PaymentOutcome {
                    success: true,
                    transaction_id: transaction.id.clone(),
                    error: None,
                },
            )
        } else {
            (
                TransactionPatch {
                    status: Some(TransactionStatus::Failed),
                    error: Some(DECLINE_MESSAGE.to_string()),
                    completed_at: Some(now),
                    ..Default::default()
                },
                WebhookEvent {
                    event: EVENT_PAYMENT_FAILED.to_string(),
                    data: serde_json::json!({
                        "transactionId": transaction.id,
                        "amount": transaction.amount,
                        "currency": transaction.currency,
                        "error": DECLINE_MESSAGE,
                        "timestamp": now,
                    }),
                },
                PaymentOutcome {
                    success: false,
                    transaction_id: transaction.id.clone(),
                    error: Some(DECLINE_MESSAGE.to_string()),
                },
            )
        };

        let settled = self.update(&transaction.id, patch).await?;
        record_payment(settled.status, settled.amount);
        tracing::info!(
            transaction_id = %settled.id,
            status = %settled.status,
            reference = ?settled.gateway_reference,
            "Payment settled"
        );

        self.webhooks.notify(event).await;

        if approved {
            self.notifier.notify(Notice::info(
                "Payment Successful",
                format!(
                    "Payment of {} {} was processed successfully.",
                    settled.amount, settled.currency
                ),
            ));
        } else {
            self.notifier.notify(Notice::destructive(
                "Payment Failed",
                "Payment was declined by the issuing bank.",
            ));
        }

        Ok(outcome)
    }
}

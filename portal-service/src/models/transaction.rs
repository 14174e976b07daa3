use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Error,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub status: Option<TransactionStatus>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub gateway: Option<String>,
    pub customer_id: Option<String>,
    pub description: Option<String>,
    pub gateway_reference: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Record for Transaction {
    type Patch = TransactionPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: TransactionPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(gateway) = patch.gateway {
            self.gateway = gateway;
        }
        if patch.customer_id.is_some() {
            self.customer_id = patch.customer_id;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.gateway_reference.is_some() {
            self.gateway_reference = patch.gateway_reference;
        }
        if patch.completed_at.is_some() {
            self.completed_at = patch.completed_at;
        }
        if patch.error.is_some() {
            self.error = patch.error;
        }
    }
}

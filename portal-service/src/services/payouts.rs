use std::sync::Arc;

use chrono::Utc;
use service_core::error::AppError;

use super::collection::{Collection, Placement};
use super::notifier::{Notice, Notifier};
use crate::models::{new_id, Payout, PayoutPatch, PayoutStatus};

pub const PAYOUTS_KEY: &str = "payouts";

#[derive(Debug, Clone, Default)]
pub struct NewPayout {
    pub beneficiary_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
}

/// Free-text search over beneficiary, account and description plus an
/// optional status. `all` disables the status filter.
#[derive(Debug, Clone, Default)]
pub struct PayoutFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl PayoutFilter {
    pub fn matches(&self, payout: &Payout) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                [
                    &payout.beneficiary_name,
                    &payout.account_number,
                    &payout.description,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        };
        let matches_status = match self.status.as_deref() {
            None | Some("") | Some("all") => true,
            Some(status) => payout.status.as_str() == status,
        };
        matches_search && matches_status
    }
}

#[derive(Clone)]
pub struct PayoutService {
    payouts: Arc<Collection<Payout>>,
    notifier: Arc<dyn Notifier>,
}

impl PayoutService {
    pub fn new(payouts: Arc<Collection<Payout>>, notifier: Arc<dyn Notifier>) -> Self {
        Self { payouts, notifier }
    }

    pub async fn list(&self, filter: &PayoutFilter) -> Vec<Payout> {
        self.payouts
            .all()
            .await
            .into_iter()
            .filter(|payout| filter.matches(payout))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Payout, AppError> {
        self.payouts
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Payout"))
    }

    /// New payouts start `pending` at the head of the list.
    pub async fn create(&self, new: NewPayout) -> Result<Payout, AppError> {
        let payout = Payout {
            id: new_id(),
            created_at: Utc::now(),
            status: PayoutStatus::Pending,
            beneficiary_name: new.beneficiary_name,
            account_number: new.account_number,
            ifsc_code: new.ifsc_code,
            bank_name: new.bank_name,
            amount: new.amount,
            currency: new.currency,
            description: new.description,
            processed_at: None,
        };
        let payout = self.payouts.insert(payout, Placement::Front).await?;

        tracing::info!(
            payout_id = %payout.id,
            amount = payout.amount,
            currency = %payout.currency,
            "Payout created"
        );
        self.notifier.notify(Notice::info(
            "Payout Created",
            "Payout request has been created successfully.",
        ));
        Ok(payout)
    }

    pub async fn update(&self, id: &str, patch: PayoutPatch) -> Result<Payout, AppError> {
        let payout = self
            .payouts
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Payout"))?;

        tracing::info!(payout_id = %id, status = %payout.status, "Payout updated");
        self.notifier.notify(Notice::info(
            "Payout Updated",
            "Payout has been updated successfully.",
        ));
        Ok(payout)
    }

    /// Move a payout to `status`, stamping or clearing `processedAt`.
    pub async fn update_status(&self, id: &str, status: PayoutStatus) -> Result<Payout, AppError> {
        self.update(id, PayoutPatch::status_change(status)).await
    }
}

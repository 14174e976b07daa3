use std::sync::Arc;

use chrono::Utc;
use service_core::error::AppError;

use super::collection::{Collection, Placement};
use super::notifier::{Notice, Notifier};
use crate::models::referral::UNKNOWN_REFERRER;
use crate::models::{new_id, Merchant, Referral, ReferralPatch, ReferralStatus};

pub const REFERRALS_KEY: &str = "referrals";

#[derive(Clone)]
pub struct ReferralService {
    referrals: Arc<Collection<Referral>>,
    merchants: Arc<Collection<Merchant>>,
    notifier: Arc<dyn Notifier>,
}

impl ReferralService {
    pub fn new(
        referrals: Arc<Collection<Referral>>,
        merchants: Arc<Collection<Merchant>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            referrals,
            merchants,
            notifier,
        }
    }

    /// Case-insensitive search over referrer name and referred email.
    pub async fn list(&self, search: Option<&str>) -> Vec<Referral> {
        let needle = search.map(str::trim).unwrap_or_default().to_lowercase();
        self.referrals
            .all()
            .await
            .into_iter()
            .filter(|r| {
                needle.is_empty()
                    || r.referrer_name.to_lowercase().contains(&needle)
                    || r.referred_email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    async fn referrer_name(&self, referrer_id: &str) -> String {
        self.merchants
            .get(referrer_id)
            .await
            .map(|m| m.name)
            .unwrap_or_else(|| UNKNOWN_REFERRER.to_string())
    }

    pub async fn add(&self, referrer_id: String, referred_email: String) -> Result<Referral, AppError> {
        let referral = Referral {
            id: new_id(),
            referrer_name: self.referrer_name(&referrer_id).await,
            referrer_id,
            referred_email,
            status: ReferralStatus::Pending,
            created_at: Utc::now(),
        };
        let referral = self.referrals.insert(referral, Placement::Back).await?;

        tracing::info!(
            referral_id = %referral.id,
            referrer_id = %referral.referrer_id,
            "Referral added"
        );
        self.notifier.notify(Notice::info(
            "Referral Added",
            "New referral has been added successfully.",
        ));
        Ok(referral)
    }

    pub async fn update(&self, id: &str, mut patch: ReferralPatch) -> Result<Referral, AppError> {
        patch.referrer_name = match patch.referrer_id.as_deref() {
            Some(referrer_id) => Some(self.referrer_name(referrer_id).await),
            None => None,
        };
        let referral = self
            .referrals
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Referral"))?;

        tracing::info!(referral_id = %id, "Referral updated");
        self.notifier.notify(Notice::info(
            "Referral Updated",
            "Referral has been updated successfully.",
        ));
        Ok(referral)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Name recorded when the referrer id matches no merchant.
pub const UNKNOWN_REFERRER: &str = "Unknown Referrer";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: String,
    pub referrer_id: String,
    pub referrer_name: String,
    pub referred_email: String,
    pub status: ReferralStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralPatch {
    pub referrer_id: Option<String>,
    /// Filled in by the service from the merchants list, never by callers.
    #[serde(skip)]
    pub referrer_name: Option<String>,
    pub referred_email: Option<String>,
    pub status: Option<ReferralStatus>,
}

impl Record for Referral {
    type Patch = ReferralPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: ReferralPatch) {
        if let Some(referrer_id) = patch.referrer_id {
            self.referrer_id = referrer_id;
        }
        if let Some(referrer_name) = patch.referrer_name {
            self.referrer_name = referrer_name;
        }
        if let Some(referred_email) = patch.referred_email {
            self.referred_email = referred_email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

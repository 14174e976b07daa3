use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Completed,
    Rejected,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: PayoutStatus,
    pub beneficiary_name: String,
    pub account_number: String,
    #[serde(default)]
    pub ifsc_code: String,
    #[serde(default)]
    pub bank_name: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutPatch {
    pub status: Option<PayoutStatus>,
    pub beneficiary_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the timestamp.
    #[serde(default, with = "double_option")]
    pub processed_at: Option<Option<DateTime<Utc>>>,
}

impl PayoutPatch {
    /// Status change as done from the payout list: anything other than
    /// `pending` stamps `processed_at`, `pending` clears it.
    pub fn status_change(status: PayoutStatus) -> Self {
        let processed_at = match status {
            PayoutStatus::Pending => None,
            _ => Some(Utc::now()),
        };
        Self {
            status: Some(status),
            processed_at: Some(processed_at),
            ..Default::default()
        }
    }
}

impl Record for Payout {
    type Patch = PayoutPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: PayoutPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(beneficiary_name) = patch.beneficiary_name {
            self.beneficiary_name = beneficiary_name;
        }
        if let Some(account_number) = patch.account_number {
            self.account_number = account_number;
        }
        if let Some(ifsc_code) = patch.ifsc_code {
            self.ifsc_code = ifsc_code;
        }
        if let Some(bank_name) = patch.bank_name {
            self.bank_name = bank_name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(processed_at) = patch.processed_at {
            self.processed_at = processed_at;
        }
    }
}

// Distinguishes a missing `processedAt` from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payout() -> Payout {
        Payout {
            id: "p1".into(),
            created_at: Utc::now(),
            status: PayoutStatus::Pending,
            beneficiary_name: "Asha Rao".into(),
            account_number: "001122334455".into(),
            ifsc_code: "HDFC0001234".into(),
            bank_name: "HDFC".into(),
            amount: 1500.0,
            currency: "INR".into(),
            description: "Vendor settlement".into(),
            processed_at: None,
        }
    }

    #[test]
    fn completing_stamps_processed_at() {
        let mut p = payout();
        p.apply(PayoutPatch::status_change(PayoutStatus::Completed));
        assert_eq!(p.status, PayoutStatus::Completed);
        assert!(p.processed_at.is_some());
    }

    #[test]
    fn reverting_to_pending_clears_processed_at() {
        let mut p = payout();
        p.apply(PayoutPatch::status_change(PayoutStatus::Rejected));
        p.apply(PayoutPatch::status_change(PayoutStatus::Pending));
        assert_eq!(p.status, PayoutStatus::Pending);
        assert!(p.processed_at.is_none());
    }

    #[test]
    fn explicit_null_clears_but_missing_keeps() {
        let mut p = payout();
        p.processed_at = Some(Utc::now());

        let keep: PayoutPatch = serde_json::from_str(r#"{"bankName":"SBI"}"#).unwrap();
        p.apply(keep);
        assert!(p.processed_at.is_some());
        assert_eq!(p.bank_name, "SBI");

        let clear: PayoutPatch = serde_json::from_str(r#"{"processedAt":null}"#).unwrap();
        p.apply(clear);
        assert!(p.processed_at.is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_MERCHANT: &str = "merchant";

/// Portal user or manager account. Managers are users kept in their own
/// collection with the `manager` role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl Record for User {
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Submitted,
    Verified,
    Rejected,
}

/// Documents a merchant hands in for verification. Files are referenced by
/// name; their contents are not stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KycData {
    pub pan_number: String,
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub business_address_proof: Option<String>,
    #[serde(default)]
    pub bank_statement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc_data: Option<KycData>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub kyc_status: Option<KycStatus>,
    pub kyc_data: Option<KycData>,
}

impl Record for Merchant {
    type Patch = MerchantPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: MerchantPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(company_name) = patch.company_name {
            self.company_name = company_name;
        }
        if let Some(website) = patch.website {
            self.website = website;
        }
        if let Some(kyc_status) = patch.kyc_status {
            self.kyc_status = kyc_status;
        }
        if patch.kyc_data.is_some() {
            self.kyc_data = patch.kyc_data;
        }
        // The role is pinned: a merchant record is always a merchant.
        self.role = ROLE_MERCHANT.to_string();
    }
}

use serde::{Deserialize, Serialize};

use super::Record;

/// Processor family, derived from the gateway name. Decides which
/// credential fields a gateway needs before it can connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    PayU,
    PlatformPayments,
    Other,
}

impl GatewayKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "PayU" => GatewayKind::PayU,
            "PlatformPayments" => GatewayKind::PlatformPayments,
            _ => GatewayKind::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentGateway {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_secret: Option<String>,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub api_key: Option<String>,
    pub merchant_id: Option<String>,
    pub salt: Option<String>,
    pub key_secret: Option<String>,
    pub currency: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl PaymentGateway {
    pub fn kind(&self) -> GatewayKind {
        GatewayKind::from_name(&self.name)
    }

    /// Whether every credential the processor family needs is filled in.
    pub fn credentials_complete(&self) -> bool {
        if self.api_key.is_empty() {
            return false;
        }
        match self.kind() {
            GatewayKind::PayU => filled(&self.merchant_id) && filled(&self.salt),
            GatewayKind::PlatformPayments => filled(&self.key_secret),
            GatewayKind::Other => false,
        }
    }

    /// Gateways present on first start.
    pub fn defaults() -> Vec<Self> {
        vec![
            PaymentGateway {
                id: "1".to_string(),
                name: "PayU".to_string(),
                is_active: true,
                api_key: String::new(),
                merchant_id: Some(String::new()),
                salt: Some(String::new()),
                key_secret: None,
                currency: "INR".to_string(),
            },
            PaymentGateway {
                id: "2".to_string(),
                name: "PlatformPayments".to_string(),
                is_active: false,
                api_key: String::new(),
                merchant_id: None,
                salt: None,
                key_secret: Some(String::new()),
                currency: "INR".to_string(),
            },
        ]
    }
}

impl Record for PaymentGateway {
    type Patch = GatewayPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: GatewayPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = api_key;
        }
        if let Some(merchant_id) = patch.merchant_id {
            self.merchant_id = Some(merchant_id);
        }
        if let Some(salt) = patch.salt {
            self.salt = Some(salt);
        }
        if let Some(key_secret) = patch.key_secret {
            self.key_secret = Some(key_secret);
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
    }
}

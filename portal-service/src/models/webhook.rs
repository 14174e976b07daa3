use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Subscribes a webhook to every event.
pub const EVENT_ALL: &str = "all";
pub const EVENT_PAYMENT_SUCCESS: &str = "payment.success";
pub const EVENT_PAYMENT_FAILED: &str = "payment.failed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub events: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub secret: Option<String>,
    pub events: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl Webhook {
    /// Active and subscribed to `event`, directly or through `all`.
    pub fn accepts(&self, event: &str) -> bool {
        self.is_active && self.events.iter().any(|e| e == EVENT_ALL || e == event)
    }
}

impl Record for Webhook {
    type Patch = WebhookPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: WebhookPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(secret) = patch.secret {
            self.secret = secret;
        }
        if let Some(events) = patch.events {
            self.events = events;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Event body handed to subscribed webhooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookEvent {
    pub event: String,
    pub data: serde_json::Value,
}

/// Record of one simulated delivery. Nothing leaves the process; this is
/// what would have been POSTed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDelivery {
    pub id: String,
    pub webhook_id: String,
    pub url: String,
    pub event: String,
    pub payload: WebhookEvent,
    /// Unix seconds the signature was computed over.
    pub timestamp: i64,
    /// Hex HMAC-SHA256 of the payload; absent when the webhook has no secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

use std::sync::Arc;

use chrono::Utc;
use rand::RngCore;
use service_core::error::AppError;
use service_core::utils::signature::generate_signature;

use super::collection::{Collection, Placement};
use super::metrics::record_webhook_delivery;
use super::notifier::{Notice, Notifier, RecentLog};
use crate::models::{new_id, Webhook, WebhookDelivery, WebhookEvent, WebhookPatch};

pub const WEBHOOKS_KEY: &str = "webhooks";

/// Deliveries kept for inspection.
pub const DELIVERY_LOG_CAPACITY: usize = 100;

/// Fields an operator supplies for a new webhook.
#[derive(Debug, Clone)]
pub struct NewWebhook {
    pub name: String,
    pub url: String,
    pub secret: String,
    pub events: Vec<String>,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct WebhookService {
    webhooks: Arc<Collection<Webhook>>,
    deliveries: Arc<RecentLog<WebhookDelivery>>,
    notifier: Arc<dyn Notifier>,
}

impl WebhookService {
    pub fn new(
        webhooks: Arc<Collection<Webhook>>,
        deliveries: Arc<RecentLog<WebhookDelivery>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            webhooks,
            deliveries,
            notifier,
        }
    }

    pub async fn list(&self) -> Vec<Webhook> {
        self.webhooks.all().await
    }

    pub async fn add(&self, new: NewWebhook) -> Result<Webhook, AppError> {
        let webhook = Webhook {
            id: new_id(),
            name: new.name,
            url: new.url,
            secret: new.secret,
            events: new.events,
            is_active: new.is_active,
            created_at: Utc::now(),
        };
        let webhook = self.webhooks.insert(webhook, Placement::Back).await?;

        tracing::info!(webhook_id = %webhook.id, url = %webhook.url, "Webhook added");
        self.notifier.notify(Notice::info(
            "Webhook Added",
            "New webhook endpoint has been added successfully.",
        ));
        Ok(webhook)
    }

    pub async fn update(&self, id: &str, patch: WebhookPatch) -> Result<Webhook, AppError> {
        let webhook = self
            .webhooks
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Webhook"))?;

        tracing::info!(webhook_id = %id, "Webhook updated");
        self.notifier.notify(Notice::info(
            "Webhook Updated",
            "Webhook settings have been updated successfully.",
        ));
        Ok(webhook)
    }

    pub async fn toggle_active(&self, id: &str) -> Result<Webhook, AppError> {
        let webhook = self
            .webhooks
            .modify(id, |webhook| webhook.is_active = !webhook.is_active)
            .await?
            .ok_or_else(|| AppError::not_found("Webhook"))?;

        let (title, verb) = if webhook.is_active {
            ("Webhook Activated", "activated")
        } else {
            ("Webhook Deactivated", "deactivated")
        };
        let name = if webhook.name.is_empty() {
            "Webhook"
        } else {
            webhook.name.as_str()
        };
        self.notifier
            .notify(Notice::info(title, format!("{} has been {}.", name, verb)));
        Ok(webhook)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        if self.webhooks.remove(id).await? == 0 {
            return Err(AppError::not_found("Webhook"));
        }

        tracing::info!(webhook_id = %id, "Webhook removed");
        self.notifier.notify(Notice::info(
            "Webhook Deleted",
            "Webhook has been removed successfully.",
        ));
        Ok(())
    }

    /// Record a delivery for every active webhook subscribed to the event.
    /// Nothing is sent over the network.
    pub async fn notify(&self, event: WebhookEvent) -> Vec<WebhookDelivery> {
        let body = match serde_json::to_string(&event) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(event = %event.event, error = %e, "Failed to encode webhook event");
                return Vec::new();
            }
        };
        let timestamp = Utc::now().timestamp();

        let deliveries: Vec<WebhookDelivery> = self
            .webhooks
            .all()
            .await
            .into_iter()
            .filter(|webhook| webhook.accepts(&event.event))
            .map(|webhook| {
                let signature = if webhook.secret.is_empty() {
                    None
                } else {
                    generate_signature(&webhook.secret, timestamp, &body)
                        .inspect_err(|e| {
                            tracing::warn!(webhook_id = %webhook.id, error = %e, "Failed to sign webhook payload")
                        })
                        .ok()
                };

                tracing::info!(
                    webhook_id = %webhook.id,
                    url = %webhook.url,
                    event = %event.event,
                    signed = signature.is_some(),
                    "Simulating webhook delivery"
                );

                WebhookDelivery {
                    id: new_id(),
                    webhook_id: webhook.id,
                    url: webhook.url,
                    event: event.event.clone(),
                    payload: event.clone(),
                    timestamp,
                    signature,
                }
            })
            .collect();

        for delivery in &deliveries {
            record_webhook_delivery(&delivery.event);
            self.deliveries.push(delivery.clone());
        }

        deliveries
    }

    pub fn deliveries(&self) -> Vec<WebhookDelivery> {
        self.deliveries.snapshot()
    }
}

/// 32 random bytes, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::webhook::{EVENT_ALL, EVENT_PAYMENT_FAILED, EVENT_PAYMENT_SUCCESS};
    use crate::services::notifier::NoticeBoard;
    use crate::services::store::MemoryStore;
    use service_core::utils::signature::verify_signature;

    async fn service() -> WebhookService {
        let webhooks = Collection::load(WEBHOOKS_KEY, Arc::new(MemoryStore::new()), Vec::new)
            .await
            .unwrap();
        WebhookService::new(
            Arc::new(webhooks),
            Arc::new(RecentLog::new(DELIVERY_LOG_CAPACITY)),
            Arc::new(NoticeBoard::new(20)),
        )
    }

    fn new_hook(name: &str, events: &[&str], is_active: bool, secret: &str) -> NewWebhook {
        NewWebhook {
            name: name.to_string(),
            url: format!("https://example.com/{}", name),
            secret: secret.to_string(),
            events: events.iter().map(|e| e.to_string()).collect(),
            is_active,
        }
    }

    fn success_event() -> WebhookEvent {
        WebhookEvent {
            event: EVENT_PAYMENT_SUCCESS.to_string(),
            data: serde_json::json!({ "transactionId": "t1", "amount": 100.0 }),
        }
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_webhook() {
        let svc = service().await;
        let a = svc.add(new_hook("a", &[EVENT_ALL], true, "")).await.unwrap();
        let b = svc.add(new_hook("b", &[EVENT_ALL], true, "")).await.unwrap();
        let c = svc.add(new_hook("c", &[EVENT_ALL], true, "")).await.unwrap();

        svc.remove(&b.id).await.unwrap();

        let ids: Vec<String> = svc.list().await.into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let svc = service().await;
        assert!(matches!(
            svc.remove("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn notify_reaches_only_active_subscribers() {
        let svc = service().await;
        let all = svc.add(new_hook("all", &[EVENT_ALL], true, "")).await.unwrap();
        let success = svc
            .add(new_hook("ok", &[EVENT_PAYMENT_SUCCESS], true, ""))
            .await
            .unwrap();
        svc.add(new_hook("fail", &[EVENT_PAYMENT_FAILED], true, ""))
            .await
            .unwrap();
        svc.add(new_hook("off", &[EVENT_ALL], false, ""))
            .await
            .unwrap();

        let deliveries = svc.notify(success_event()).await;
        let targets: Vec<String> = deliveries.into_iter().map(|d| d.webhook_id).collect();
        assert_eq!(targets, vec![all.id, success.id]);
        assert_eq!(svc.deliveries().len(), 2);
    }

    #[tokio::test]
    async fn deliveries_are_signed_with_the_webhook_secret() {
        let svc = service().await;
        svc.add(new_hook("signed", &[EVENT_ALL], true, "s3cret"))
            .await
            .unwrap();
        svc.add(new_hook("plain", &[EVENT_ALL], true, "")).await.unwrap();

        let deliveries = svc.notify(success_event()).await;
        let signed = &deliveries[0];
        let body = serde_json::to_string(&signed.payload).unwrap();
        let signature = signed.signature.as_deref().unwrap();
        assert!(verify_signature("s3cret", signed.timestamp, &body, signature).unwrap());
        assert!(deliveries[1].signature.is_none());
    }

    #[tokio::test]
    async fn toggle_reports_webhook_name() {
        let svc = service().await;
        let hook = svc.add(new_hook("orders", &[EVENT_ALL], true, "")).await.unwrap();
        let toggled = svc.toggle_active(&hook.id).await.unwrap();
        assert!(!toggled.is_active);
        assert_eq!(toggled.events, hook.events);
    }

    #[tokio::test]
    async fn concurrent_toggles_cancel_out() {
        let svc = service().await;
        let hook = svc.add(new_hook("orders", &[EVENT_ALL], true, "")).await.unwrap();

        let (first, second) = tokio::join!(svc.toggle_active(&hook.id), svc.toggle_active(&hook.id));
        first.unwrap();
        second.unwrap();

        let stored = svc.list().await.into_iter().find(|w| w.id == hook.id).unwrap();
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn toggle_unknown_is_not_found() {
        let svc = service().await;
        assert!(matches!(
            svc.toggle_active("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn generated_secret_is_64_hex_chars() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }
}

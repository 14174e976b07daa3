#![allow(dead_code)]

use portal_service::config::PortalConfig;
use portal_service::services::{KeyValueStore, MemoryStore};
use portal_service::startup::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn KeyValueStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn with instant, always-approving payments.
    pub async fn spawn() -> Self {
        Self::spawn_with_success_rate(1.0).await
    }

    pub async fn spawn_with_success_rate(success_rate: f64) -> Self {
        Self::spawn_on_store(Arc::new(MemoryStore::new()), success_rate).await
    }

    /// Spawn on an existing store, e.g. to check state survives a restart.
    pub async fn spawn_on_store(store: Arc<dyn KeyValueStore>, success_rate: f64) -> Self {
        let mut config = PortalConfig::default();
        config.common.port = 0; // Random port
        config.service_name = "portal-service-test".to_string();
        config.simulation.payment_delay_ms = 0;
        config.simulation.gateway_test_delay_ms = 0;
        config.simulation.payment_success_rate = success_rate;

        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

//! Key-value persistence for portal state.
//!
//! Every collection is serialised as one JSON document under its own key.
//! The in-memory store backs tests and single-node demos; the Redis store
//! keeps state across restarts.

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StorageError(anyhow::Error::new(err))
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn save(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Read `key` and decode it, or fall back to `default` when the key is absent.
pub async fn load_json<T, F>(
    store: &dyn KeyValueStore,
    key: &str,
    default: F,
) -> Result<T, StoreError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.load(key).await? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        }),
        None => Ok(default()),
    }
}

pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.save(key, raw).await
}

#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!(key_prefix = %key_prefix, "Connected to Redis store");
        Ok(Self {
            connection,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.connection.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(self.key(key))
            .query_async(&mut con)
            .await?;
        Ok(value)
    }

    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let _: () = redis::cmd("SET")
            .arg(self.key(key))
            .arg(value)
            .query_async(&mut con)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut con).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "unexpected PING reply: {}",
                pong
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_loads_default() {
        let store = MemoryStore::new();
        let value: Vec<String> = load_json(&store, "webhooks", Vec::new).await.unwrap();
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn saved_value_round_trips() {
        let store = MemoryStore::new();
        save_json(&store, "payouts", &vec!["a", "b"]).await.unwrap();
        let value: Vec<String> = load_json(&store, "payouts", Vec::new).await.unwrap();
        assert_eq!(value, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn corrupt_value_reports_key() {
        let store = MemoryStore::new();
        store.save("users", "not json".to_string()).await.unwrap();
        let err = load_json::<Vec<String>, _>(&store, "users", Vec::new)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("users"));
    }
}

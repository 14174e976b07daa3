//! In-memory record lists mirrored to the key-value store.
//!
//! Each mutation edits the list under the write lock and then writes the
//! whole list back under the collection's key. If the write fails the
//! in-memory change stays and the error is returned to the caller.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use super::store::{load_json, save_json, KeyValueStore, StoreError};
use crate::models::Record;

/// Where a new record lands in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Newest first (transactions, payouts).
    Front,
    /// Oldest first (webhooks, accounts, referrals).
    Back,
}

pub struct Collection<T> {
    key: &'static str,
    items: RwLock<Vec<T>>,
    store: Arc<dyn KeyValueStore>,
}

impl<T: Record> Collection<T> {
    pub async fn load<F>(
        key: &'static str,
        store: Arc<dyn KeyValueStore>,
        default: F,
    ) -> Result<Self, StoreError>
    where
        F: FnOnce() -> Vec<T>,
    {
        let items: Vec<T> = load_json(store.as_ref(), key, default).await?;
        tracing::debug!(key, count = items.len(), "Loaded collection");
        Ok(Self {
            key,
            items: RwLock::new(items),
            store,
        })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub async fn insert(&self, item: T, placement: Placement) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        match placement {
            Placement::Front => items.insert(0, item.clone()),
            Placement::Back => items.push(item.clone()),
        }
        self.persist(&items).await?;
        Ok(item)
    }

    /// Shallow-merge `patch` into the record with `id`. `Ok(None)` when no
    /// record matches; the list is then left untouched.
    pub async fn update(&self, id: &str, patch: T::Patch) -> Result<Option<T>, StoreError> {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        item.apply(patch);
        let updated = item.clone();
        self.persist(&items).await?;
        Ok(Some(updated))
    }

    /// Run `edit` on the record with `id` and persist, all under one write
    /// guard. `Ok(None)` when no record matches.
    pub async fn modify<F>(&self, id: &str, edit: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        edit(item);
        let updated = item.clone();
        self.persist(&items).await?;
        Ok(Some(updated))
    }

    /// Drop every record with `id`. Returns how many were removed.
    pub async fn remove(&self, id: &str) -> Result<usize, StoreError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id() != id);
        let removed = before - items.len();
        if removed > 0 {
            self.persist(&items).await?;
        }
        Ok(removed)
    }

    async fn persist(&self, items: &[T]) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), self.key, items)
            .await
            .inspect_err(|e| tracing::error!(key = self.key, error = %e, "Failed to persist collection"))
    }
}

/// A single persisted record, replaced as a whole.
pub struct Singleton<T> {
    key: &'static str,
    value: RwLock<T>,
    store: Arc<dyn KeyValueStore>,
}

impl<T> Singleton<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub async fn load<F>(
        key: &'static str,
        store: Arc<dyn KeyValueStore>,
        default: F,
    ) -> Result<Self, StoreError>
    where
        F: FnOnce() -> T,
    {
        let value = load_json(store.as_ref(), key, default).await?;
        Ok(Self {
            key,
            value: RwLock::new(value),
            store,
        })
    }

    pub async fn get(&self) -> T {
        self.value.read().await.clone()
    }

    pub async fn replace(&self, value: T) -> Result<T, StoreError> {
        let mut current = self.value.write().await;
        *current = value.clone();
        save_json(self.store.as_ref(), self.key, &*current).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserPatch};
    use crate::services::store::MemoryStore;
    use chrono::Utc;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            role: "customer".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn users(store: Arc<dyn KeyValueStore>) -> Collection<User> {
        Collection::load("users", store, Vec::new).await.unwrap()
    }

    #[tokio::test]
    async fn placement_controls_order() {
        let coll = users(Arc::new(MemoryStore::new())).await;
        coll.insert(user("1", "a"), Placement::Back).await.unwrap();
        coll.insert(user("2", "b"), Placement::Back).await.unwrap();
        coll.insert(user("3", "c"), Placement::Front).await.unwrap();

        let ids: Vec<String> = coll.all().await.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn remove_drops_only_matching_id() {
        let coll = users(Arc::new(MemoryStore::new())).await;
        for (id, name) in [("1", "a"), ("2", "b"), ("3", "c")] {
            coll.insert(user(id, name), Placement::Back).await.unwrap();
        }

        assert_eq!(coll.remove("2").await.unwrap(), 1);
        let ids: Vec<String> = coll.all().await.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert_eq!(coll.remove("missing").await.unwrap(), 0);
        assert_eq!(coll.all().await.len(), 2);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let coll = users(Arc::new(MemoryStore::new())).await;
        coll.insert(user("1", "a"), Placement::Back).await.unwrap();

        let result = coll
            .update(
                "nope",
                UserPatch {
                    name: Some("x".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(coll.get("1").await.unwrap().name, "a");
    }

    #[tokio::test]
    async fn mutations_are_visible_after_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let coll = users(store.clone()).await;
        coll.insert(user("1", "a"), Placement::Back).await.unwrap();
        coll.update(
            "1",
            UserPatch {
                role: Some("admin".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let reloaded = users(store).await;
        let stored = reloaded.get("1").await.unwrap();
        assert_eq!(stored.role, "admin");
        assert_eq!(stored.name, "a");
    }

    #[tokio::test]
    async fn modify_edits_in_place_and_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let coll = users(store.clone()).await;
        coll.insert(user("1", "a"), Placement::Back).await.unwrap();

        let edited = coll
            .modify("1", |u| u.name.push_str("-renamed"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.name, "a-renamed");
        assert!(coll.modify("nope", |u| u.name.clear()).await.unwrap().is_none());

        let reloaded = users(store).await;
        assert_eq!(reloaded.get("1").await.unwrap().name, "a-renamed");
    }

    #[tokio::test]
    async fn concurrent_modifies_are_not_lost() {
        let coll = Arc::new(users(Arc::new(MemoryStore::new())).await);
        coll.insert(user("1", "a"), Placement::Back).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let coll = coll.clone();
                tokio::spawn(async move { coll.modify("1", |u| u.name.push('x')).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(coll.get("1").await.unwrap().name, "axxxxxxxx");
    }

    #[tokio::test]
    async fn singleton_replaces_whole_value() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let single = Singleton::load("counter", store.clone(), || 1u32)
            .await
            .unwrap();
        assert_eq!(single.get().await, 1);
        single.replace(7).await.unwrap();

        let reloaded = Singleton::load("counter", store, || 1u32).await.unwrap();
        assert_eq!(reloaded.get().await, 7);
    }
}

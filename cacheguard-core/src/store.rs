//! The key-value store capability.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::StoreError;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The two-method key-value capability the policy engine depends on.
///
/// The engine never needs more than a lookup and a TTL-bearing write, so this
/// trait deliberately exposes nothing else. Any conforming type may be
/// substituted — a Redis client, a different store's adapter, or an
/// in-memory test double.
#[async_trait]
pub trait Store: Sync + Send {
    /// Look up `key`. Absence is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key` with the given time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;
}

#[async_trait]
impl Store for &dyn Store {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (*self).get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        (*self).set(key, value, ttl).await
    }
}

#[async_trait]
impl Store for Box<dyn Store> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        (**self).set(key, value, ttl).await
    }
}

#[async_trait]
impl Store for Arc<dyn Store + Send + 'static> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        (**self).set(key, value, ttl).await
    }
}

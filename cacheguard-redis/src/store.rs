//! Redis store implementation.

use std::time::Duration;

use async_trait::async_trait;
use cacheguard_core::{Store, StoreResult};
use redis::{Client, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

/// Redis key-value store based on the redis-rs crate.
///
/// Implements the [`Store`] capability over a lazily-initialized
/// [`ConnectionManager`], so constructing the store never touches the
/// network.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// Create a new store with default settings (`redis://127.0.0.1/`).
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Creates a new store builder with default settings.
    #[must_use]
    pub fn builder() -> RedisStoreBuilder {
        RedisStoreBuilder::default()
    }

    /// Wrap an already-constructed Redis client.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
        }
    }

    /// Create lazy connection to Redis via [`ConnectionManager`].
    pub async fn connection(&self) -> Result<&ConnectionManager, Error> {
        trace!("Get connection manager");
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("Initialize new redis connection manager");
                self.client.get_connection_manager()
            })
            .await?;
        Ok(manager)
    }
}

/// Part of builder pattern implementation for [`RedisStore`].
pub struct RedisStoreBuilder {
    connection_info: String,
}

impl Default for RedisStoreBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
        }
    }
}

impl RedisStoreBuilder {
    /// Set connection info (host, port, database, etc.) for the store.
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Create a new store instance with the passed settings.
    pub fn build(self) -> Result<RedisStore, Error> {
        Ok(RedisStore::from_client(Client::open(self.connection_info)?))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut con = self.connection().await?.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut con = self.connection().await?.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        // Zero means "no expiry", matching the SET command's own semantics
        // (PX 0 would be rejected by the server).
        if !ttl.is_zero() {
            cmd.arg("PX").arg(ttl.as_millis() as u64);
        }
        cmd.query_async::<()>(&mut con).await.map_err(Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_invalid_url() {
        let result = RedisStore::builder().server("not-a-valid-url").build();
        assert!(matches!(result, Err(Error::Redis(_))));
    }

    #[test]
    fn build_does_not_connect() {
        // An unreachable server is fine at build time; connections are lazy.
        let store = RedisStore::builder()
            .server("redis://127.0.0.1:1/")
            .build();
        assert!(store.is_ok());
    }
}

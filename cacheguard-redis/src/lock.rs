//! Distributed lock over Redis.
//!
//! The classic single-instance locking pattern: acquisition is one
//! `SET name token NX PX ttl`, release is a Lua compare-and-delete so a
//! holder can never free a lock that has expired and been re-acquired by
//! someone else. The lock's TTL bounds how long a crashed holder keeps the
//! name dead; fencing across Redis failover is out of scope.

use std::time::Duration;

use async_trait::async_trait;
use cacheguard_core::{LockError, LockGuard, LockManager};
use redis::{Client, Script, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Per-key distributed lock manager based on the redis-rs crate.
#[derive(Clone)]
pub struct RedisLockManager {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisLockManager {
    /// Wrap an already-constructed Redis client.
    ///
    /// The client is cheap to clone, so the lock manager can share one with
    /// a [`RedisStore`](crate::RedisStore).
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&ConnectionManager, Error> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("Initialize new redis connection manager for locks");
                self.client.get_connection_manager()
            })
            .await?;
        Ok(manager)
    }
}

#[async_trait]
impl LockManager for RedisLockManager {
    type Guard = RedisLock;

    async fn lock(&self, name: &str, ttl: Duration) -> Result<RedisLock, LockError> {
        let mut connection = self.connection().await?.clone();
        let token = format!("{:032x}", rand::random::<u128>());

        // NX makes acquisition atomic; a nil reply means another owner holds
        // the name.
        let reply: Option<String> = redis::cmd("SET")
            .arg(name)
            .arg(&token)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut connection)
            .await
            .map_err(Error::from)?;

        match reply {
            Some(_) => {
                trace!(name, "lock acquired");
                Ok(RedisLock {
                    connection,
                    name: name.to_owned(),
                    token,
                })
            }
            None => Err(LockError::Contended),
        }
    }
}

/// A held Redis lock.
///
/// Bound to the acquiring token; release only deletes the name if the token
/// still matches.
pub struct RedisLock {
    connection: ConnectionManager,
    name: String,
    token: String,
}

#[async_trait]
impl LockGuard for RedisLock {
    async fn release(mut self) -> Result<(), LockError> {
        let released: i32 = Script::new(RELEASE_SCRIPT)
            .key(&self.name)
            .arg(&self.token)
            .invoke_async(&mut self.connection)
            .await
            .map_err(Error::from)?;
        if released == 0 {
            // The TTL expired before release; nothing left to free.
            trace!(name = %self.name, "lock already expired at release");
        }
        Ok(())
    }
}

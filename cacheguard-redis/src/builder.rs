//! Assembling a full engine over Redis.

use std::sync::Arc;

use cacheguard::{CacheGuard, Policy};
use cacheguard_core::Backfill;
use redis::{
    Client, ConnectionAddr, ConnectionInfo, ErrorKind, RedisConnectionInfo, RedisError,
};

use crate::{Error, RedisLockManager, RedisStore};

const DEFAULT_PORT: u16 = 6379;

/// Primitive Redis connection options.
///
/// An alternative to supplying a pre-built [`Client`]: address, credential
/// and database index, from which a default client is constructed.
#[derive(Debug, Clone, Default)]
pub struct RedisOptions {
    /// Server address, `host:port` (the port defaults to 6379 when omitted).
    pub addr: String,
    /// Password, if the server requires AUTH.
    pub password: Option<String>,
    /// Database index.
    pub db: i64,
}

impl RedisOptions {
    /// Build typed connection info from the fields.
    ///
    /// Fields are passed through as-is, so a password may contain characters
    /// that would need escaping in a connection URL.
    fn connection_info(&self) -> Result<ConnectionInfo, Error> {
        let (host, port) = match self.addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| {
                    RedisError::from((ErrorKind::InvalidClientConfig, "invalid port in addr"))
                })?;
                (host.to_owned(), port)
            }
            None => (self.addr.clone(), DEFAULT_PORT),
        };
        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..Default::default()
            },
        })
    }
}

/// Builder for a [`CacheGuard`] running on Redis.
///
/// Exactly one of [`client`](Self::client) or [`options`](Self::options)
/// must be supplied; the store and the lock manager then share that client.
/// Supplying neither fails at build time with [`Error::MissingClient`],
/// never at call time.
///
/// ```rust,no_run
/// use cacheguard_redis::{GuardBuilder, RedisOptions};
///
/// # fn main() -> Result<(), cacheguard_redis::Error> {
/// let mut guard = GuardBuilder::new()
///     .options(RedisOptions {
///         addr: "localhost:6379".into(),
///         ..Default::default()
///     })
///     .build()?;
/// guard.set_auto_backfill(true);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct GuardBuilder {
    client: Option<Client>,
    options: Option<RedisOptions>,
    policy: Option<Policy>,
    backfill: Option<Arc<dyn Backfill>>,
}

impl GuardBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already-constructed Redis client.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build a default client from primitive connection options.
    ///
    /// Ignored when a client was supplied via [`client`](Self::client).
    pub fn options(mut self, options: RedisOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the engine policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the authoritative data source invoked on a miss.
    pub fn backfill(mut self, backfill: impl Backfill + 'static) -> Self {
        self.backfill = Some(Arc::new(backfill));
        self
    }

    /// Assemble the engine.
    pub fn build(self) -> Result<CacheGuard<RedisStore, RedisLockManager>, Error> {
        let client = match (self.client, self.options) {
            (Some(client), _) => client,
            (None, Some(options)) => Client::open(options.connection_info()?)?,
            (None, None) => return Err(Error::MissingClient),
        };

        let store = RedisStore::from_client(client.clone());
        let locker = RedisLockManager::from_client(client);

        let mut guard = CacheGuard::new(store, locker);
        if let Some(policy) = self.policy {
            guard.set_policy(policy);
        }
        if let Some(backfill) = self.backfill {
            guard.set_shared_backfill(backfill);
        }
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_client_or_options_fails() {
        let result = GuardBuilder::new().build();
        assert!(matches!(result, Err(Error::MissingClient)));
    }

    #[test]
    fn options_produce_a_client() {
        let guard = GuardBuilder::new()
            .options(RedisOptions {
                addr: "localhost:6379".into(),
                ..Default::default()
            })
            .build();
        assert!(guard.is_ok());
    }

    #[test]
    fn options_fields_pass_through_untouched() {
        // URL metacharacters in the credential must survive as-is.
        let options = RedisOptions {
            addr: "localhost:6380".into(),
            password: Some("p@ss:w/rd".into()),
            db: 3,
        };
        let info = options.connection_info().unwrap();
        assert_eq!(info.addr, ConnectionAddr::Tcp("localhost".into(), 6380));
        assert_eq!(info.redis.password.as_deref(), Some("p@ss:w/rd"));
        assert_eq!(info.redis.db, 3);
    }

    #[test]
    fn addr_without_port_uses_the_default() {
        let options = RedisOptions {
            addr: "localhost".into(),
            ..Default::default()
        };
        let info = options.connection_info().unwrap();
        assert_eq!(info.addr, ConnectionAddr::Tcp("localhost".into(), DEFAULT_PORT));
    }

    #[test]
    fn unparseable_port_fails_at_build_time() {
        let result = GuardBuilder::new()
            .options(RedisOptions {
                addr: "localhost:not-a-port".into(),
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(Error::Redis(_))));
    }
}

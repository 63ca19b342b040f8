//! Error types for the Redis adapters.
//!
//! All errors convert into [`StoreError`] or [`LockError`] for uniform
//! handling in the policy engine, which never sees the redis crate directly.

use cacheguard_core::{LockError, StoreError};
use redis::RedisError;

/// Error type for Redis adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    ///
    /// Includes connection failures, protocol errors, authentication
    /// failures and command execution errors. Connections are established
    /// lazily, so an unreachable server typically surfaces on the first
    /// cache operation rather than at build time.
    #[error("Redis adapter error: {0}")]
    Redis(#[from] RedisError),

    /// Neither a client nor connection options were supplied.
    ///
    /// Call [`GuardBuilder::client`] or [`GuardBuilder::options`] before
    /// [`GuardBuilder::build`].
    ///
    /// [`GuardBuilder::client`]: crate::GuardBuilder::client
    /// [`GuardBuilder::options`]: crate::GuardBuilder::options
    /// [`GuardBuilder::build`]: crate::GuardBuilder::build
    #[error("either a Redis client or connection options must be provided")]
    MissingClient,
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        Self::Connection(Box::new(error))
    }
}

impl From<Error> for LockError {
    fn from(error: Error) -> Self {
        Self::Provider(Box::new(error))
    }
}

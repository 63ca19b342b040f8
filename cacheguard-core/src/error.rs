//! Error types for store and lock interaction.

use thiserror::Error;

/// Error type for key-value store operations.
///
/// This enum categorizes errors that can occur while talking to the backing
/// store into distinct groups for appropriate handling. A missing key is not
/// an error at this level — [`Store::get`](crate::Store::get) reports absence
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Internal store error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote stores (e.g. Redis).
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send + Sync>),
}

/// Error type for distributed lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock is already held by another owner.
    ///
    /// Callers should treat this as "try again later", not as a failure of
    /// the underlying provider.
    #[error("lock is held by another owner")]
    Contended,

    /// The lock provider itself failed (connection, protocol, ...).
    #[error(transparent)]
    Provider(Box<dyn std::error::Error + Send + Sync>),
}

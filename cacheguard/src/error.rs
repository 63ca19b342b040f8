use cacheguard_core::{BoxBackfillError, LockError, StoreError};
use thiserror::Error;

/// Error type for cache policy engine operations.
///
/// Each variant names the phase of the read/write state machine that
/// produced it, so callers can tell a missing key from a failed lock from a
/// failed source of truth. The engine never retries and never swallows an
/// error except for the best-effort writes documented on
/// [`CacheGuard::read`](crate::CacheGuard::read).
#[derive(Debug, Error)]
pub enum Error {
    /// The key is absent and backfill was not applicable.
    ///
    /// This is the underlying store's miss surfaced as-is; nothing was
    /// written and neither the lock nor the backfill source was invoked.
    #[error("key not found: {0}")]
    Miss(String),

    /// The lookup phase of a read failed.
    #[error("cache lookup failed")]
    Lookup(#[source] StoreError),

    /// A store write failed.
    #[error("cache store failed")]
    Store(#[source] StoreError),

    /// The backfill lock could not be obtained.
    ///
    /// Another caller is repopulating the key; treat as "try again later",
    /// not as a missing key.
    #[error("backfill lock not obtained")]
    Lock(#[source] LockError),

    /// The authoritative source failed. The cache is left unchanged.
    #[error("backfill source failed")]
    Backfill(#[source] BoxBackfillError),
}

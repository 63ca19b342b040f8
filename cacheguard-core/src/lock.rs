//! The distributed lock capability.
//!
//! The policy engine serializes backfills per key through this pair of
//! traits. The provider's mutual-exclusion guarantee is what enforces the
//! "at most one in-flight backfill per key" invariant — the engine itself
//! keeps no per-key state.

use std::time::Duration;

use async_trait::async_trait;

use crate::LockError;

/// Acquires named locks with a bounded lifetime.
///
/// `lock` either acquires the named lock immediately (possibly after the
/// provider's own internal retry window) or fails with
/// [`LockError::Contended`]; it never queues indefinitely. The `ttl` bounds
/// how long a crashed holder can keep the lock dead.
#[async_trait]
pub trait LockManager: Sync + Send {
    /// The guard type representing a held lock.
    type Guard: LockGuard;

    /// Acquire the lock named `name` with the given lifetime.
    async fn lock(&self, name: &str, ttl: Duration) -> Result<Self::Guard, LockError>;
}

/// A held lock, owned exclusively by the invocation that acquired it.
///
/// Release consumes the guard, so a lock can only be released once.
#[async_trait]
pub trait LockGuard: Send {
    /// Release the lock.
    async fn release(self) -> Result<(), LockError>;
}

//! The authoritative data source invoked on a cache miss.

use std::future::Future;

use async_trait::async_trait;

/// Boxed error type returned by backfill sources.
///
/// The engine does not interpret backfill failures, it only carries them back
/// to the caller, so a boxed error keeps the trait easy to implement.
pub type BoxBackfillError = Box<dyn std::error::Error + Send + Sync>;

/// A source of truth for cache misses.
///
/// Given a key, produce the authoritative value or fail. The policy engine
/// invokes the source at most once per miss per lock-holder; it never calls
/// it on a hit or when backfill is disabled.
///
/// Any async closure of the right shape implements this trait:
///
/// ```rust
/// use cacheguard_core::{Backfill, BoxBackfillError};
///
/// async fn lookup(key: String) -> Result<String, BoxBackfillError> {
///     Ok(format!("value for {key}"))
/// }
///
/// fn takes_backfill(_: impl Backfill) {}
/// takes_backfill(lookup);
/// ```
#[async_trait]
pub trait Backfill: Send + Sync {
    /// Produce the authoritative value for `key`.
    async fn fetch(&self, key: &str) -> Result<String, BoxBackfillError>;
}

#[async_trait]
impl<F, Fut> Backfill for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, BoxBackfillError>> + Send,
{
    async fn fetch(&self, key: &str) -> Result<String, BoxBackfillError> {
        (self)(key.to_owned()).await
    }
}

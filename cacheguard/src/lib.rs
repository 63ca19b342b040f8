#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cacheguard
//!
//! A cache-aside orchestration layer in front of a key-value store.
//!
//! The [`CacheGuard`] engine decides when to serve from cache, when to
//! refresh an entry's TTL (sliding expiration), when to fall back to an
//! authoritative source (backfill), and how to protect that fallback from
//! concurrent duplication (a per-key distributed lock). The store, the lock
//! provider and the backfill source are external collaborators consumed
//! through the traits in [`cacheguard_core`]; the default Redis adapters
//! live in the `cacheguard-redis` crate.
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use cacheguard::{CacheGuard, ExpireMode};
//!
//! let guard = CacheGuard::builder(store, locks)
//!     .sliding_expire(true)
//!     .sliding_duration(Duration::from_secs(30))
//!     .auto_backfill(true)
//!     .backfill(|key: String| async move { db.load(&key).await })
//!     .build();
//!
//! let value = guard.read("user:42").await?;
//! ```

pub mod builder;
/// The cache policy engine and its read/write state machine.
pub mod engine;
/// Error types for engine operations.
pub mod error;
/// TTL jitter sources.
pub mod jitter;
/// Policy configuration for engine behavior.
pub mod policy;

pub use builder::CacheGuardBuilder;
pub use engine::CacheGuard;
pub use error::Error;
pub use jitter::{Jitter, NoJitter, RandomJitter};
pub use policy::{ExpireMode, Policy};

pub use cacheguard_core::{
    Backfill, BoxBackfillError, LockError, LockGuard, LockManager, Store, StoreError, StoreResult,
};

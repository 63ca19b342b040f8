#![warn(missing_docs)]
//! # cacheguard-core
//!
//! Capability traits for the cacheguard cache-aside orchestration layer.
//!
//! The policy engine in the `cacheguard` crate never talks to a concrete
//! store or lock implementation. It is written against the narrow traits
//! defined here:
//!
//! - [`Store`] — the two key-value operations the engine needs (`get`/`set`)
//! - [`LockManager`] / [`LockGuard`] — per-key mutual exclusion for backfill
//! - [`Backfill`] — the caller-supplied authoritative data source
//!
//! Any conforming implementation is interchangeable, including test doubles.
//! The default adapters over Redis live in `cacheguard-redis`.

pub mod backfill;
pub mod error;
pub mod lock;
pub mod store;

pub use backfill::{Backfill, BoxBackfillError};
pub use error::{LockError, StoreError};
pub use lock::{LockGuard, LockManager};
pub use store::{Store, StoreResult};

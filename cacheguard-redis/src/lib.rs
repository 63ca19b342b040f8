#![warn(missing_docs)]
//! Redis adapters for the cacheguard policy engine.
//!
//! - [`RedisStore`] — the default [`Store`](cacheguard_core::Store)
//!   implementation over the redis-rs crate
//! - [`RedisLockManager`] — a per-key distributed lock via `SET NX PX` with
//!   token-checked release
//! - [`GuardBuilder`] — assembles a full [`CacheGuard`](cacheguard::CacheGuard)
//!   from either a pre-built client or primitive connection options

mod builder;
mod error;
mod lock;
mod store;

pub use builder::{GuardBuilder, RedisOptions};
pub use error::Error;
pub use lock::{RedisLock, RedisLockManager};
pub use store::{RedisStore, RedisStoreBuilder};

//! Builder for the cache policy engine.

use std::{sync::Arc, time::Duration};

use cacheguard_core::{Backfill, LockManager, Store};

use crate::{
    engine::CacheGuard,
    jitter::Jitter,
    policy::{ExpireMode, Policy},
};

/// Part of builder pattern implementation for [`CacheGuard`].
///
/// ```rust,ignore
/// let guard = CacheGuard::builder(store, locks)
///     .sliding_expire(true)
///     .sliding_duration(Duration::from_secs(30))
///     .auto_backfill(true)
///     .backfill(|key: String| async move { source.load(&key).await })
///     .build();
/// ```
pub struct CacheGuardBuilder<S, L> {
    store: S,
    locker: L,
    policy: Policy,
    jitter: Option<Arc<dyn Jitter>>,
    backfill: Option<Arc<dyn Backfill>>,
}

impl<S, L> CacheGuardBuilder<S, L>
where
    S: Store,
    L: LockManager,
{
    /// Create a builder over the given store and lock manager.
    pub fn new(store: S, locker: L) -> Self {
        Self {
            store,
            locker,
            policy: Policy::default(),
            jitter: None,
            backfill: None,
        }
    }

    /// Start from a complete [`Policy`] instead of individual toggles.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable TTL refresh on successful reads.
    pub fn sliding_expire(mut self, enabled: bool) -> Self {
        self.policy.sliding_expire = enabled;
        self
    }

    /// Set the TTL applied on sliding refresh and backfill writes.
    pub fn sliding_duration(mut self, duration: Duration) -> Self {
        self.policy.sliding_duration = duration;
        self
    }

    /// Enable or disable miss-triggered repopulation.
    pub fn auto_backfill(mut self, enabled: bool) -> Self {
        self.policy.auto_backfill = enabled;
        self
    }

    /// Set how written TTLs are computed.
    pub fn expire_mode(mut self, expire_mode: ExpireMode) -> Self {
        self.policy.expire_mode = expire_mode;
        self
    }

    /// Set the jitter upper bound for [`ExpireMode::Random`].
    pub fn random_duration(mut self, duration: Duration) -> Self {
        self.policy.random_duration = duration;
        self
    }

    /// Set the backfill lock acquisition TTL.
    pub fn lock_ttl(mut self, ttl: Duration) -> Self {
        self.policy.lock_ttl = ttl;
        self
    }

    /// Set the authoritative data source invoked on a miss.
    pub fn backfill(mut self, backfill: impl Backfill + 'static) -> Self {
        self.backfill = Some(Arc::new(backfill));
        self
    }

    /// Replace the default entropy-seeded jitter source.
    pub fn jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Some(Arc::new(jitter));
        self
    }

    /// Assemble the engine.
    pub fn build(self) -> CacheGuard<S, L> {
        let mut guard = CacheGuard::new(self.store, self.locker);
        guard.set_policy(self.policy);
        if let Some(jitter) = self.jitter {
            guard.set_shared_jitter(jitter);
        }
        if let Some(backfill) = self.backfill {
            guard.set_shared_backfill(backfill);
        }
        guard
    }
}

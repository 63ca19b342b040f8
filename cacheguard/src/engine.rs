use std::{sync::Arc, time::Duration};

use cacheguard_core::{Backfill, LockGuard, LockManager, Store};
use tracing::{debug, trace, warn};

use crate::{
    Error,
    builder::CacheGuardBuilder,
    jitter::{Jitter, RandomJitter},
    policy::{ExpireMode, LOCK_KEY_SUFFIX, Policy},
};

/// The cache policy engine.
///
/// `CacheGuard` orchestrates reads and writes against a [`Store`], invoking
/// a [`LockManager`] and a [`Backfill`] source only on a cache miss when
/// backfill is enabled. It holds no per-key state — everything between calls
/// lives in the external store — so one instance can be shared across
/// arbitrarily many tasks behind an `Arc`.
///
/// Configure the policy while the engine is still exclusively owned, then
/// share it:
///
/// ```rust,ignore
/// let mut guard = CacheGuard::new(store, locks);
/// guard.set_sliding_expire(true);
/// guard.set_sliding_duration(Duration::from_secs(30));
/// let guard = Arc::new(guard);
/// ```
pub struct CacheGuard<S, L> {
    store: S,
    locker: L,
    policy: Policy,
    jitter: Arc<dyn Jitter>,
    backfill: Option<Arc<dyn Backfill>>,
}

impl<S, L> CacheGuard<S, L>
where
    S: Store,
    L: LockManager,
{
    /// Create an engine with the default (passthrough) policy.
    pub fn new(store: S, locker: L) -> Self {
        Self {
            store,
            locker,
            policy: Policy::default(),
            jitter: Arc::new(RandomJitter::new()),
            backfill: None,
        }
    }

    /// Create a builder assembling engine, policy and jitter in one expression.
    pub fn builder(store: S, locker: L) -> CacheGuardBuilder<S, L> {
        CacheGuardBuilder::new(store, locker)
    }

    /// Read `key` through the cache policy.
    ///
    /// - **Hit**: the cached value is returned. With
    ///   [`sliding_expire`](Policy::sliding_expire) enabled the entry is
    ///   re-written with a fresh [`sliding_duration`](Policy::sliding_duration)
    ///   TTL first; that refresh is best-effort — its failure is logged and
    ///   never fails the read.
    /// - **Miss** with backfill disabled or unconfigured: [`Error::Miss`].
    /// - **Miss** with backfill: the per-key lock `{key}_lock` is acquired
    ///   for [`lock_ttl`](Policy::lock_ttl), the source of truth is invoked
    ///   exactly once, the produced value is written back (best-effort) and
    ///   the lock is released on every exit path. Lock contention surfaces
    ///   as [`Error::Lock`]; losers fail fast rather than queuing for the
    ///   winner's result.
    ///
    /// The engine imposes no timeout on the backfill source; callers needing
    /// bounded latency should wrap the future in their own deadline. If the
    /// future is dropped mid-backfill the lock's TTL bounds how long the key
    /// stays locked.
    pub async fn read(&self, key: &str) -> Result<String, Error> {
        match self.store.get(key).await {
            Ok(Some(value)) => {
                trace!(key, "cache hit");
                if self.policy.sliding_expire {
                    if let Err(error) = self.write(key, &value, self.policy.sliding_duration).await
                    {
                        warn!(key, %error, "sliding refresh failed, serving cached value");
                    }
                }
                Ok(value)
            }
            Ok(None) => match self.applicable_backfill() {
                Some(backfill) => self.backfill_key(key, backfill).await,
                None => {
                    debug!(key, "cache miss, backfill not applicable");
                    Err(Error::Miss(key.to_owned()))
                }
            },
            Err(error) => Err(Error::Lookup(error)),
        }
    }

    /// Write `value` under `key` with `base_ttl`.
    ///
    /// With [`ExpireMode::Random`] the effective TTL is `base_ttl` plus a
    /// uniform sample from `[0, random_duration)`; jitter only ever adds.
    /// Store failures propagate as [`Error::Store`] — no retry happens at
    /// this layer.
    pub async fn write(&self, key: &str, value: &str, base_ttl: Duration) -> Result<(), Error> {
        let ttl = self.effective_ttl(base_ttl);
        self.store.set(key, value, ttl).await.map_err(Error::Store)
    }

    fn effective_ttl(&self, base_ttl: Duration) -> Duration {
        match self.policy.expire_mode {
            ExpireMode::Random => base_ttl + self.jitter.sample(self.policy.random_duration),
            ExpireMode::Fixed => base_ttl,
        }
    }

    fn applicable_backfill(&self) -> Option<Arc<dyn Backfill>> {
        if self.policy.auto_backfill {
            self.backfill.clone()
        } else {
            None
        }
    }

    /// Repopulate `key` from the source of truth under the per-key lock.
    ///
    /// The lock collapses concurrent stampede backfills for one key into a
    /// single authoritative fetch; unrelated keys backfill independently.
    async fn backfill_key(&self, key: &str, backfill: Arc<dyn Backfill>) -> Result<String, Error> {
        let lock_name = format!("{key}{LOCK_KEY_SUFFIX}");
        let guard = self
            .locker
            .lock(&lock_name, self.policy.lock_ttl)
            .await
            .map_err(Error::Lock)?;
        debug!(key, "cache miss, backfilling under lock");

        let result = match backfill.fetch(key).await {
            Ok(value) => {
                // Best-effort like the sliding refresh: the caller gets the
                // authoritative value even if the write-back fails.
                if let Err(error) = self.write(key, &value, self.policy.sliding_duration).await {
                    warn!(key, %error, "backfill write-back failed, serving source value");
                }
                Ok(value)
            }
            Err(error) => Err(Error::Backfill(error)),
        };

        // Released exactly once, on success and failure alike. A release
        // failure leaves the lock to expire on its own TTL.
        if let Err(error) = guard.release().await {
            warn!(key, %error, "backfill lock release failed");
        }
        result
    }
}

/// Policy setters.
///
/// Each setter is independent; no combination is rejected. Note that
/// `sliding_duration == 0` with sliding expiration enabled degenerates to
/// zero-TTL refresh writes — the engine does not validate against it.
impl<S, L> CacheGuard<S, L> {
    /// Enable or disable miss-triggered repopulation from the source of truth.
    pub fn set_auto_backfill(&mut self, auto_backfill: bool) {
        self.policy.auto_backfill = auto_backfill;
    }

    /// Enable or disable TTL refresh on successful reads.
    pub fn set_sliding_expire(&mut self, sliding_expire: bool) {
        self.policy.sliding_expire = sliding_expire;
    }

    /// Set the TTL applied on sliding refresh and backfill writes.
    pub fn set_sliding_duration(&mut self, duration: Duration) {
        self.policy.sliding_duration = duration;
    }

    /// Set how written TTLs are computed.
    pub fn set_expire_mode(&mut self, expire_mode: ExpireMode) {
        self.policy.expire_mode = expire_mode;
    }

    /// Set the jitter upper bound for [`ExpireMode::Random`].
    pub fn set_random_duration(&mut self, duration: Duration) {
        self.policy.random_duration = duration;
    }

    /// Set the backfill lock acquisition TTL.
    pub fn set_lock_ttl(&mut self, ttl: Duration) {
        self.policy.lock_ttl = ttl;
    }

    /// Set the authoritative data source invoked on a miss.
    pub fn set_backfill(&mut self, backfill: impl Backfill + 'static) {
        self.backfill = Some(Arc::new(backfill));
    }

    /// Set an already-shared backfill source.
    pub fn set_shared_backfill(&mut self, backfill: Arc<dyn Backfill>) {
        self.backfill = Some(backfill);
    }

    /// Replace the whole policy at once.
    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }

    /// Replace the jitter source, e.g. with a seeded one in tests.
    pub fn set_jitter(&mut self, jitter: impl Jitter + 'static) {
        self.jitter = Arc::new(jitter);
    }

    /// Set an already-shared jitter source.
    pub fn set_shared_jitter(&mut self, jitter: Arc<dyn Jitter>) {
        self.jitter = jitter;
    }

    /// Whether written TTLs are jittered.
    pub fn expire_mode_is_random(&self) -> bool {
        self.policy.expire_mode_is_random()
    }

    /// The engine's current policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backfill lock acquisition TTL.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(10);

/// Suffix appended to a key to form its backfill lock name.
pub const LOCK_KEY_SUFFIX: &str = "_lock";

/// How written TTLs are computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpireMode {
    /// The base TTL is used as-is.
    #[default]
    Fixed,
    /// A uniform random duration in `[0, random_duration)` is added to the
    /// base TTL, staggering expirations of keys written around the same time.
    Random,
}

/// Cache behavior policy configuration.
///
/// Immutable once the engine is shared; the engine exposes independent
/// setters for each field while it is still exclusively owned. Durations
/// deserialize from humantime strings (e.g. "30s", "500ms"), so a policy can
/// be loaded from a config file as well as set programmatically.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Policy {
    /// Whether a successful read re-writes the entry with a fresh TTL.
    #[serde(default)]
    pub sliding_expire: bool,
    /// TTL applied on sliding refresh and on backfill writes (e.g. "30s").
    #[serde(default, with = "humantime_serde")]
    pub sliding_duration: Duration,
    /// Whether a miss triggers source-of-truth repopulation.
    #[serde(default)]
    pub auto_backfill: bool,
    /// Whether written TTLs are jittered.
    #[serde(default)]
    pub expire_mode: ExpireMode,
    /// Upper bound added to TTLs when `expire_mode` is [`ExpireMode::Random`].
    #[serde(default, with = "humantime_serde")]
    pub random_duration: Duration,
    /// Backfill lock acquisition TTL.
    #[serde(default = "default_lock_ttl", with = "humantime_serde")]
    pub lock_ttl: Duration,
}

fn default_lock_ttl() -> Duration {
    DEFAULT_LOCK_TTL
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            sliding_expire: false,
            sliding_duration: Duration::ZERO,
            auto_backfill: false,
            expire_mode: ExpireMode::default(),
            random_duration: Duration::ZERO,
            lock_ttl: DEFAULT_LOCK_TTL,
        }
    }
}

impl Policy {
    /// Whether written TTLs are jittered.
    pub fn expire_mode_is_random(&self) -> bool {
        self.expire_mode == ExpireMode::Random
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_passthrough() {
        let policy = Policy::default();
        assert!(!policy.sliding_expire);
        assert!(!policy.auto_backfill);
        assert_eq!(policy.expire_mode, ExpireMode::Fixed);
        assert_eq!(policy.lock_ttl, DEFAULT_LOCK_TTL);
    }

    #[test]
    fn deserialize_humantime_durations() {
        let policy: Policy = serde_json::from_str(
            r#"{
                "sliding_expire": true,
                "sliding_duration": "30s",
                "auto_backfill": true,
                "expire_mode": "random",
                "random_duration": "5s"
            }"#,
        )
        .unwrap();
        assert!(policy.sliding_expire);
        assert_eq!(policy.sliding_duration, Duration::from_secs(30));
        assert!(policy.expire_mode_is_random());
        assert_eq!(policy.random_duration, Duration::from_secs(5));
        // lock_ttl falls back to the default when omitted
        assert_eq!(policy.lock_ttl, DEFAULT_LOCK_TTL);
    }
}

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cacheguard_core::{LockError, LockGuard, LockManager, Store, StoreError, StoreResult};
use dashmap::DashMap;

#[derive(Clone, Debug)]
pub struct StoredEntry {
    pub value: String,
    pub ttl: Duration,
}

#[derive(Debug, Default)]
pub struct StoreCounters {
    pub read_count: AtomicUsize,
    pub write_count: AtomicUsize,
}

/// In-memory store double recording every write's TTL.
#[derive(Clone, Default)]
pub struct MockStore {
    entries: Arc<DashMap<String, StoredEntry>>,
    counters: Arc<StoreCounters>,
    ttl_log: Arc<Mutex<Vec<Duration>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.insert(
            key.to_owned(),
            StoredEntry {
                value: value.to_owned(),
                ttl,
            },
        );
    }

    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn read_count(&self) -> usize {
        self.counters.read_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.counters.write_count.load(Ordering::SeqCst)
    }

    pub fn written_ttls(&self) -> Vec<Duration> {
        self.ttl_log.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MockStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("mock read failure".into()));
        }
        Ok(self.entries.get(key).map(|e| e.value().value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("mock write failure".into()));
        }
        self.ttl_log.lock().unwrap().push(ttl);
        self.insert(key, value, ttl);
        Ok(())
    }
}

/// Lock double enforcing real mutual exclusion over a shared name table.
#[derive(Clone, Default)]
pub struct MockLockManager {
    held: Arc<DashMap<String, ()>>,
    pub acquire_count: Arc<AtomicUsize>,
    pub contended_count: Arc<AtomicUsize>,
    pub release_count: Arc<AtomicUsize>,
}

impl MockLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, name: &str) -> bool {
        self.held.contains_key(name)
    }

    pub fn acquires(&self) -> usize {
        self.acquire_count.load(Ordering::SeqCst)
    }

    pub fn contentions(&self) -> usize {
        self.contended_count.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.release_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LockManager for MockLockManager {
    type Guard = MockLockGuard;

    async fn lock(&self, name: &str, _ttl: Duration) -> Result<MockLockGuard, LockError> {
        match self.held.entry(name.to_owned()) {
            dashmap::Entry::Occupied(_) => {
                self.contended_count.fetch_add(1, Ordering::SeqCst);
                Err(LockError::Contended)
            }
            dashmap::Entry::Vacant(vacant) => {
                vacant.insert(());
                self.acquire_count.fetch_add(1, Ordering::SeqCst);
                Ok(MockLockGuard {
                    held: Arc::clone(&self.held),
                    release_count: Arc::clone(&self.release_count),
                    name: name.to_owned(),
                })
            }
        }
    }
}

pub struct MockLockGuard {
    held: Arc<DashMap<String, ()>>,
    release_count: Arc<AtomicUsize>,
    name: String,
}

#[async_trait]
impl LockGuard for MockLockGuard {
    async fn release(self) -> Result<(), LockError> {
        self.held.remove(&self.name);
        self.release_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

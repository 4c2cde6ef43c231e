mod common;

use clickstream::capability::{KeyValueStore, ManualClock, MemoryStore};
use clickstream::error::StoreError;
use clickstream::session::SessionIdentity;
use common::UnavailableStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Always-failing storage that counts how often it is touched.
#[derive(Default)]
struct CountingFailingStore {
    calls: AtomicUsize,
}

impl KeyValueStore for CountingFailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("private browsing".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("private browsing".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("private browsing".to_string()))
    }
}

#[test]
fn test_get_twice_returns_same_id() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_123));
    let session = SessionIdentity::new(store, clock.clone(), "session_id");

    let first = session.get();
    clock.advance(5_000);
    let second = session.get();

    assert_eq!(first, second, "Session id must be stable within a session");
}

#[test]
fn test_id_format() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_123));
    let session = SessionIdentity::new(store, clock, "session_id");

    let id = session.get();
    let parts: Vec<&str> = id.splitn(3, '_').collect();

    assert_eq!(parts.len(), 3, "Expected session_<ts>_<suffix>, got {}", id);
    assert_eq!(parts[0], "session");
    assert_eq!(parts[1], "1700000000123");
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_id_persisted_once_and_shared() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(42));

    let a = SessionIdentity::new(store.clone(), clock.clone(), "session_id");
    let id = a.get();
    assert_eq!(store.get("session_id").unwrap(), Some(id.clone()));

    // A second pipeline in the same browsing session picks up the same id.
    clock.advance(1_000);
    let b = SessionIdentity::new(store.clone(), clock, "session_id");
    assert_eq!(b.get(), id);
}

#[test]
fn test_new_session_after_storage_cleared() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_000));

    let first = SessionIdentity::new(store.clone(), clock.clone(), "session_id").get();
    store.remove("session_id").unwrap();
    clock.advance(10);
    let second = SessionIdentity::new(store, clock, "session_id").get();

    assert_ne!(first, second);
}

#[test]
fn test_unavailable_storage_still_stable() {
    let clock = Arc::new(ManualClock::new(1_000));
    let session = SessionIdentity::new(Arc::new(UnavailableStore), clock, "session_id");

    let first = session.get();
    let second = session.get();

    assert!(first.starts_with("session_1000_"));
    assert_eq!(first, second, "In-memory fallback must keep the id stable");
}

#[test]
fn test_failing_storage_touched_only_until_degraded() {
    let store = Arc::new(CountingFailingStore::default());
    let session = SessionIdentity::new(store.clone(), Arc::new(ManualClock::new(7)), "session_id");

    let id = session.get();
    let touched = store.calls.load(Ordering::SeqCst);
    assert_eq!(touched, 2, "One read and one write attempt on first use");
    assert!(session.is_degraded());

    // Every envelope asks for the id; none of them should reach storage again.
    for _ in 0..1_000 {
        assert_eq!(session.get(), id);
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), touched);
}

#[test]
fn test_healthy_storage_not_degraded() {
    let session = SessionIdentity::new(Arc::new(MemoryStore::new()), Arc::new(ManualClock::new(7)), "session_id");
    session.get();
    assert!(!session.is_degraded());
}

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::capability::{Clock, KeyValueStore};
use crate::error::StoreError;

const SUFFIX_LEN: usize = 9;

/// Session-scoped identifier, `session_<ms timestamp>_<random suffix>`.
///
/// Created lazily on first `get()` and written once to session-scoped
/// storage. Not a secret: the suffix only has to make collisions between
/// sessions started in the same millisecond unlikely.
pub struct SessionIdentity {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    state: Mutex<Cached>,
}

#[derive(Default)]
struct Cached {
    // Survives a storage failure so the id stays stable for this page.
    id: Option<String>,
    degraded: bool,
}

impl SessionIdentity {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, key: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            key: key.into(),
            state: Mutex::new(Cached::default()),
        }
    }

    /// Once storage has failed, the cached id is served without touching
    /// storage again. Degradation is logged once.
    pub fn get(&self) -> String {
        let mut state = self.state.lock();
        if state.degraded {
            if let Some(id) = state.id.as_ref() {
                return id.clone();
            }
        }

        match self.store.get(&self.key) {
            Ok(Some(id)) if !id.is_empty() => {
                state.id = Some(id.clone());
                return id;
            }
            Ok(_) => {}
            Err(e) => degrade(&mut state, "unreadable", &e),
        }

        if let Some(id) = state.id.as_ref() {
            return id.clone();
        }

        let id = generate(self.clock.now_ms());
        if let Err(e) = self.store.set(&self.key, &id) {
            degrade(&mut state, "unwritable", &e);
        }
        debug!(session = %id, "Created session id");
        state.id = Some(id.clone());
        id
    }

    /// True once session storage has failed; the id then lives only in memory.
    pub fn is_degraded(&self) -> bool {
        self.state.lock().degraded
    }
}

fn degrade(state: &mut Cached, what: &str, error: &StoreError) {
    if !state.degraded {
        warn!(error = %error, "Session storage {}, session id will not outlive this page", what);
        state.degraded = true;
    }
}

fn generate(now_ms: u64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", now_ms, &random[..SUFFIX_LEN])
}

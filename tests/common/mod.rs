#![allow(dead_code)]

use async_trait::async_trait;
use clickstream::capability::{KeyValueStore, ManualClock, MemoryStore, StaticPage};
use clickstream::error::{StoreError, TransportError};
use clickstream::transport::Transport;
use clickstream::{Environment, EventEnvelope, Pipeline, PipelineConfig};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const PAGE_URL: &str = "http://localhost:5000/course/1";

/// Transport fake: succeeds or fails on demand, records every payload, and
/// can hold each call until a permit is released.
#[derive(Default)]
pub struct ScriptedTransport {
    succeed: AtomicBool,
    fail_matching: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    attempts: AtomicUsize,
    attempted: Mutex<Vec<Vec<u8>>>,
    delivered: Mutex<Vec<EventEnvelope>>,
    delivered_payloads: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedTransport {
    pub fn succeeding() -> Arc<Self> {
        let t = Self::default();
        t.succeed.store(true, Ordering::SeqCst);
        Arc::new(t)
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    /// Fail any payload containing `needle`, regardless of `succeed`.
    pub fn fail_matching(&self, needle: &str) {
        *self.fail_matching.lock().unwrap() = Some(needle.to_string());
    }

    /// Every subsequent send waits for a permit on the returned semaphore.
    pub fn gate(&self) -> Arc<Semaphore> {
        let semaphore = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(semaphore.clone());
        semaphore
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn attempted_payloads(&self) -> Vec<Vec<u8>> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<EventEnvelope> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_payloads(&self) -> Vec<Vec<u8>> {
        self.delivered_payloads.lock().unwrap().clone()
    }

    pub fn delivered_types(&self) -> Vec<String> {
        self.delivered()
            .iter()
            .map(|e| e.event_type().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn send(&self, envelope: &EventEnvelope) -> Result<(), TransportError> {
        let payload = envelope
            .payload()
            .map_err(|e| TransportError::Serialization(e.to_string()))?;
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.attempted.lock().unwrap().push(payload.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        let blocked = self
            .fail_matching
            .lock()
            .unwrap()
            .as_ref()
            .map(|needle| String::from_utf8_lossy(&payload).contains(needle.as_str()))
            .unwrap_or(false);

        if self.succeed.load(Ordering::SeqCst) && !blocked {
            self.delivered.lock().unwrap().push(envelope.clone());
            self.delivered_payloads.lock().unwrap().push(payload);
            Ok(())
        } else {
            Err(TransportError::Network("connection refused".to_string()))
        }
    }
}

/// Storage that is never available (quota exhausted, private browsing).
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub session_store: Arc<dyn KeyValueStore>,
    pub durable_store: Arc<dyn KeyValueStore>,
    pub transport: Arc<ScriptedTransport>,
    pub page: Arc<StaticPage>,
}

impl Harness {
    pub fn new(transport: Arc<ScriptedTransport>) -> Self {
        Self::with_stores(transport, Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn with_stores(
        transport: Arc<ScriptedTransport>,
        session_store: Arc<dyn KeyValueStore>,
        durable_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        clickstream::logging::init();
        Self {
            clock: Arc::new(ManualClock::new(1_700_000_000_000)),
            session_store,
            durable_store,
            transport,
            page: Arc::new(StaticPage::new(PAGE_URL, "Intro to Python", "http://localhost:5000/")),
        }
    }

    pub fn env(&self) -> Environment {
        Environment {
            clock: self.clock.clone(),
            session_store: self.session_store.clone(),
            durable_store: self.durable_store.clone(),
            transport: self.transport.clone(),
            page: self.page.clone(),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline_with(PipelineConfig::default())
    }

    pub fn pipeline_with(&self, config: PipelineConfig) -> Pipeline {
        Pipeline::new(config, self.env())
    }

    /// Raw JSON currently persisted under the queue key.
    pub fn persisted_queue(&self) -> serde_json::Value {
        let raw = self
            .durable_store
            .get(clickstream::config::QUEUE_KEY)
            .unwrap()
            .unwrap_or_else(|| "[]".to_string());
        serde_json::from_str(&raw).unwrap()
    }
}

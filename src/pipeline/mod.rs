//! Orchestration: signal in, envelope out.
//!
//! [`Pipeline`] is the synchronous core. It gates a signal, stamps session
//! and page location on it, and hands the envelope to the queue; the only
//! asynchronous work (transport calls) happens in tasks the queue owns.
//! [`PipelineDriver`] wires it to a signal channel and the timers.
//!
//! **LAW**: no producer ever observes a delivery error. Telemetry loss must
//! never break the page.

pub mod driver;
pub mod sink;
pub mod state;

pub use driver::PipelineDriver;
pub use sink::SignalSink;
pub use state::PipelineState;

use std::sync::Arc;
use tracing::{debug, info};

use crate::capability::{Clock, KeyValueStore, PageContext};
use crate::config::PipelineConfig;
use crate::envelope::{Capture, ElementType, EventEnvelope, EventType};
use crate::queue::{DeliveryQueue, EntryId, FlushReport};
use crate::rate::{Gate, RateController};
use crate::session::SessionIdentity;
use crate::signal::{PageLifecycle, Signal};
use crate::transport::Transport;

/// Host capabilities a pipeline runs against.
#[derive(Clone)]
pub struct Environment {
    pub clock: Arc<dyn Clock>,
    pub session_store: Arc<dyn KeyValueStore>,
    pub durable_store: Arc<dyn KeyValueStore>,
    pub transport: Arc<dyn Transport>,
    pub page: Arc<dyn PageContext>,
}

pub struct Pipeline {
    config: PipelineConfig,
    state: PipelineState,
    queue: DeliveryQueue,
    clock: Arc<dyn Clock>,
    page: Arc<dyn PageContext>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, env: Environment) -> Self {
        let started_ms = env.clock.now_ms();
        let session = SessionIdentity::new(env.session_store, env.clock.clone(), config.session_key.clone());
        let rate = RateController::new(&config, started_ms);
        let queue = DeliveryQueue::new(&config, env.durable_store, env.transport, env.clock.clone());

        Self {
            state: PipelineState::new(session, rate, started_ms),
            queue,
            clock: env.clock,
            page: env.page,
            config,
        }
    }

    /// Restores the durable queue and emits the initial `page_view`.
    /// Returns how many events were recovered from a previous page lifetime.
    ///
    /// Recovered events are not sent here; the driver flushes once producers
    /// are attached, or call [`Pipeline::flush_all`].
    pub fn initialize(&mut self) -> usize {
        if self.state.initialized {
            return 0;
        }
        self.state.initialized = true;

        let recovered = self.queue.restore();

        let title = self.page.title();
        let page_view = Capture::new(EventType::PageView, title.clone(), ElementType::Page)
            .with("page_title", title)
            .with("referrer", self.page.referrer());
        self.emit(page_view);

        info!(session = %self.state.session.get(), recovered, "Clickstream tracking initialized");
        recovered
    }

    /// Routes a raw signal through rate control and enqueues the resulting
    /// envelope, if any.
    pub fn submit(&mut self, signal: Signal) -> Option<EntryId> {
        if self.state.exited {
            debug!("Signal after page exit ignored");
            return None;
        }
        let now = self.clock.now_ms();
        let page_url = self.page.url();
        match self.state.rate.gate(now, signal, &page_url) {
            Gate::Emit(capture) => Some(self.emit(capture)),
            Gate::Deferred | Gate::Suppressed => None,
        }
    }

    /// Emits deferred (debounced) events whose quiet period is over.
    pub fn fire_due(&mut self) -> Option<EntryId> {
        if self.state.exited {
            return None;
        }
        let capture = self.state.rate.fire_due(self.clock.now_ms())?;
        Some(self.emit(capture))
    }

    /// Ms epoch at which a deferred event becomes due.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.state.rate.next_deadline()
    }

    /// One dwell sampler tick.
    pub fn sample_dwell(&mut self) -> Option<EntryId> {
        if self.state.exited {
            return None;
        }
        let page_url = self.page.url();
        let capture = self.state.rate.sample_dwell(self.clock.now_ms(), &page_url)?;
        Some(self.emit(capture))
    }

    pub fn on_lifecycle(&mut self, lifecycle: PageLifecycle) {
        match lifecycle {
            PageLifecycle::Hidden => self.flush(),
            PageLifecycle::Visible => {}
            PageLifecycle::Unload => {
                self.unload();
            }
        }
    }

    /// Teardown: emits `page_exit` with the total dwell time, drops pending
    /// debounced events, and starts a best-effort flush. Only the first call
    /// does anything.
    pub fn unload(&mut self) -> Option<EntryId> {
        if self.state.exited {
            return None;
        }
        let now = self.clock.now_ms();
        self.state.rate.teardown();

        let page_url = self.page.url();
        let page_exit = Capture::new(EventType::PageExit, "page_exit", ElementType::Page)
            .with("time_spent_seconds", self.state.rate.dwell_secs(now))
            .with("page_url", page_url);
        let id = self.emit(page_exit);
        self.state.exited = true;

        self.flush();
        Some(id)
    }

    /// Background retry of everything queued.
    pub fn flush(&self) {
        self.queue.spawn_flush();
    }

    pub async fn flush_all(&self) -> FlushReport {
        self.queue.flush_all().await
    }

    pub fn queue(&self) -> &DeliveryQueue {
        &self.queue
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn session_id(&self) -> String {
        self.state.session.get()
    }

    fn emit(&mut self, capture: Capture) -> EntryId {
        let envelope = EventEnvelope::new(capture, self.state.session.get(), self.page.url());
        debug!(event_type = %envelope.event_type(), element_id = envelope.element_id(), "Captured");
        self.queue.enqueue(envelope)
    }
}

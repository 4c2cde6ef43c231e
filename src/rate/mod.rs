//! Rate control for high-frequency signal sources.
//!
//! Three policies, each a small pure state machine fed with `now_ms`:
//! - [`Debounce`] for viewport resizes
//! - [`MagnitudeThrottle`] for pointer movement
//! - [`DwellSampler`] for time-on-page heartbeats
//!
//! State is page-lifetime only. Nothing here is persisted.

pub mod debounce;
pub mod sampler;
pub mod throttle;

pub use debounce::Debounce;
pub use sampler::DwellSampler;
pub use throttle::{MagnitudeThrottle, Movement, Point};

use tracing::debug;

use crate::config::PipelineConfig;
use crate::envelope::{Capture, ElementType, EventType};
use crate::signal::{Signal, Viewport};

/// Outcome of offering a signal to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Build an envelope from this now.
    Emit(Capture),
    /// Held back; may come out later from [`RateController::fire_due`].
    Deferred,
    /// Dropped with no side effect.
    Suppressed,
}

pub struct RateController {
    pointer: MagnitudeThrottle,
    viewport: Debounce<Viewport>,
    dwell: DwellSampler,
}

impl RateController {
    pub fn new(config: &PipelineConfig, started_ms: u64) -> Self {
        Self {
            pointer: MagnitudeThrottle::new(config.throttle_interval_ms, config.magnitude_threshold),
            viewport: Debounce::new(config.debounce_delay_ms),
            dwell: DwellSampler::new(started_ms, config.report_interval_secs),
        }
    }

    pub fn gate(&mut self, now_ms: u64, signal: Signal, page_url: &str) -> Gate {
        match signal {
            Signal::Discrete(capture) => Gate::Emit(capture),
            Signal::PointerMove { x, y } => match self.pointer.offer(now_ms, Point { x, y }) {
                Some(movement) => Gate::Emit(mouse_movement(movement, page_url)),
                None => Gate::Suppressed,
            },
            Signal::ViewportResize(viewport) => {
                self.viewport.signal(now_ms, viewport);
                Gate::Deferred
            }
        }
    }

    /// Deferred events whose quiet period has elapsed.
    pub fn fire_due(&mut self, now_ms: u64) -> Option<Capture> {
        self.viewport.poll(now_ms).map(window_resize)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.viewport.deadline()
    }

    /// Called on every sampler tick.
    pub fn sample_dwell(&mut self, now_ms: u64, page_url: &str) -> Option<Capture> {
        self.dwell.sample(now_ms).map(|secs| {
            Capture::new(EventType::TimeOnPage, format!("time_{}s", secs), ElementType::Time)
                .with("time_spent_seconds", secs)
                .with("page_url", page_url)
        })
    }

    pub fn dwell_secs(&self, now_ms: u64) -> u64 {
        self.dwell.elapsed_secs(now_ms)
    }

    /// Page teardown: pending debounced events are low value and dropped.
    pub fn teardown(&mut self) {
        if self.viewport.cancel() {
            debug!("Dropped pending window_resize on teardown");
        }
    }
}

fn mouse_movement(movement: Movement, page_url: &str) -> Capture {
    Capture::new(EventType::MouseMovement, "mouse_move", ElementType::Mouse)
        .with("mouse_x", movement.x)
        .with("mouse_y", movement.y)
        .with("delta_x", movement.delta_x)
        .with("delta_y", movement.delta_y)
        .with("page_url", page_url)
}

fn window_resize(viewport: Viewport) -> Capture {
    Capture::new(EventType::WindowResize, "window_resize", ElementType::Window)
        .with("window_width", viewport.window_width)
        .with("window_height", viewport.window_height)
        .with("screen_width", viewport.screen_width)
        .with("screen_height", viewport.screen_height)
}

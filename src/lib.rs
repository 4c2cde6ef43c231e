//! Clickstream capture-and-delivery pipeline.
//!
//! ```text
//! producer ─► SignalSink ─► Pipeline ─► RateController ─► EventEnvelope
//!                                                            │
//!                       Transport ◄── DeliveryQueue ◄────────┘
//!                                          │
//!                                  durable store (failed_events)
//! ```
//!
//! Delivery is at-least-once: every envelope is written to durable storage
//! before the first attempt and removed only on acknowledgment.

pub mod capability;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod producers;
pub mod queue;
pub mod rate;
pub mod session;
pub mod signal;
pub mod transport;

pub use config::PipelineConfig;
pub use envelope::{Capture, ElementType, EventEnvelope, EventType};
pub use error::{PipelineError, Result};
pub use pipeline::{Environment, Pipeline, PipelineDriver, SignalSink};
pub use queue::{DeliveryQueue, FlushReport};
pub use signal::{Input, PageLifecycle, Signal, Viewport};

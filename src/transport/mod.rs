//! One-shot delivery to the collection endpoint.
//!
//! A transport makes exactly one attempt per call and reports the result.
//! Retry bookkeeping lives in the queue, never here.

pub mod http;

pub use http::{HttpTransport, SESSION_HEADER};

use async_trait::async_trait;

use crate::envelope::EventEnvelope;
use crate::error::TransportError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Single delivery attempt. `Ok` only when the endpoint acknowledged the event.
    async fn send(&self, envelope: &EventEnvelope) -> Result<(), TransportError>;
}

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::envelope::{Capture, ElementType, EventType};
use crate::signal::{Input, PageLifecycle, Signal};

/// The one narrow interface capture producers see.
///
/// Never blocks and never reports delivery errors. The `bool` returned by
/// each method only says whether the pipeline accepted the signal (it is
/// `false` when the pipeline is gone or saturated).
#[derive(Clone, Debug)]
pub struct SignalSink {
    tx: mpsc::Sender<Input>,
}

impl SignalSink {
    pub fn new(tx: mpsc::Sender<Input>) -> Self {
        Self { tx }
    }

    pub fn submit(&self, signal: impl Into<Signal>) -> bool {
        self.send(Input::Signal(signal.into()))
    }

    /// `submit(eventType, elementId, elementType, additionalData)`
    pub fn track(
        &self,
        event_type: EventType,
        element_id: impl Into<String>,
        element_type: ElementType,
        additional_data: Map<String, Value>,
    ) -> bool {
        self.submit(Capture::new(event_type, element_id, element_type).with_data(additional_data))
    }

    pub fn lifecycle(&self, lifecycle: PageLifecycle) -> bool {
        self.send(Input::Lifecycle(lifecycle))
    }

    fn send(&self, input: Input) -> bool {
        match self.tx.try_send(input) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Pipeline saturated, dropping signal");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

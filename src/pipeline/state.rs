use crate::rate::RateController;
use crate::session::SessionIdentity;

/// Everything one pipeline instance owns across its page lifetime.
/// Nothing here is global; two pipelines never share state.
pub struct PipelineState {
    pub session: SessionIdentity,
    pub rate: RateController,
    pub started_ms: u64,
    pub initialized: bool,
    /// Set once `page_exit` has been emitted.
    pub exited: bool,
}

impl PipelineState {
    pub fn new(session: SessionIdentity, rate: RateController, started_ms: u64) -> Self {
        Self {
            session,
            rate,
            started_ms,
            initialized: false,
            exited: false,
        }
    }
}

use crate::error::PipelineError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/track_event";

/// Quiet period after the last viewport signal before `window_resize` fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
/// Minimum spacing between two `mouse_movement` events.
pub const DEFAULT_THROTTLE_INTERVAL_MS: u64 = 5_000;
/// Pointer travel (per axis) required before a movement is worth reporting.
pub const DEFAULT_MAGNITUDE_THRESHOLD: f64 = 100.0;
/// Dwell sampler cadence.
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 1_000;
/// `time_on_page` heartbeat interval.
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MAX_QUEUE_LEN: usize = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_UNLOAD_GRACE_MS: u64 = 500;

pub const SESSION_KEY: &str = "session_id";
pub const QUEUE_KEY: &str = "failed_events";

/// Every tunable of the pipeline. All values are compiled-in defaults;
/// the composing application overrides fields directly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub endpoint: String,
    pub request_timeout_ms: u64,

    // Rate control
    pub debounce_delay_ms: u64,
    pub throttle_interval_ms: u64,
    pub magnitude_threshold: f64,
    pub sample_period_ms: u64,
    pub report_interval_secs: u64,

    // Retry queue bounds
    pub max_attempts: u32,
    pub max_queue_len: usize,

    /// How long the driver waits for in-flight sends after `Unload`.
    pub unload_grace_ms: u64,

    pub session_key: String,
    pub queue_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            debounce_delay_ms: DEFAULT_DEBOUNCE_MS,
            throttle_interval_ms: DEFAULT_THROTTLE_INTERVAL_MS,
            magnitude_threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            report_interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_queue_len: DEFAULT_MAX_QUEUE_LEN,
            unload_grace_ms: DEFAULT_UNLOAD_GRACE_MS,
            session_key: SESSION_KEY.to_string(),
            queue_key: QUEUE_KEY.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.endpoint.trim().is_empty() {
            return Err(PipelineError::Config("endpoint must not be empty".to_string()));
        }
        let intervals = [
            ("debounce_delay_ms", self.debounce_delay_ms),
            ("throttle_interval_ms", self.throttle_interval_ms),
            ("sample_period_ms", self.sample_period_ms),
            ("report_interval_secs", self.report_interval_secs),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(PipelineError::Config(format!("{} must be greater than zero", name)));
            }
        }
        if self.magnitude_threshold.is_nan() || self.magnitude_threshold < 0.0 {
            return Err(PipelineError::Config("magnitude_threshold must be a non-negative number".to_string()));
        }
        if self.max_attempts == 0 || self.max_queue_len == 0 {
            return Err(PipelineError::Config("queue bounds must be greater than zero".to_string()));
        }
        if self.session_key.is_empty() || self.queue_key.is_empty() {
            return Err(PipelineError::Config("storage keys must not be empty".to_string()));
        }
        Ok(())
    }
}

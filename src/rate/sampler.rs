/// Dwell-time sampler.
///
/// Driven by a fixed-period timer; reports only when the rounded elapsed
/// seconds land on a multiple of the reporting interval. Each second is
/// reported at most once, even if two ticks round to the same value.
#[derive(Debug)]
pub struct DwellSampler {
    started_ms: u64,
    report_interval_secs: u64,
    last_reported_secs: u64,
}

impl DwellSampler {
    pub fn new(started_ms: u64, report_interval_secs: u64) -> Self {
        Self {
            started_ms,
            report_interval_secs,
            last_reported_secs: 0,
        }
    }

    /// Whole seconds on the page, rounded to nearest.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        (now_ms.saturating_sub(self.started_ms) + 500) / 1000
    }

    pub fn sample(&mut self, now_ms: u64) -> Option<u64> {
        let secs = self.elapsed_secs(now_ms);
        if secs == 0 || self.report_interval_secs == 0 || secs % self.report_interval_secs != 0 {
            return None;
        }
        if secs == self.last_reported_secs {
            return None;
        }
        self.last_reported_secs = secs;
        Some(secs)
    }
}

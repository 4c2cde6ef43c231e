#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A movement that passed both gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Throttle with a magnitude gate.
///
/// A position is reported only if more than `interval_ms` passed since the
/// last report AND it moved more than `threshold` along either axis from the
/// last reported position. Failing either gate leaves the state untouched.
#[derive(Debug)]
pub struct MagnitudeThrottle {
    interval_ms: u64,
    threshold: f64,
    last_emit_ms: Option<u64>,
    anchor: Point,
}

impl MagnitudeThrottle {
    pub fn new(interval_ms: u64, threshold: f64) -> Self {
        Self {
            interval_ms,
            threshold,
            last_emit_ms: None,
            anchor: Point::default(),
        }
    }

    pub fn offer(&mut self, now_ms: u64, position: Point) -> Option<Movement> {
        let time_open = match self.last_emit_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.interval_ms,
        };
        if !time_open {
            return None;
        }

        let delta_x = (position.x - self.anchor.x).abs();
        let delta_y = (position.y - self.anchor.y).abs();
        if delta_x <= self.threshold && delta_y <= self.threshold {
            return None;
        }

        self.last_emit_ms = Some(now_ms);
        self.anchor = position;
        Some(Movement { x: position.x, y: position.y, delta_x, delta_y })
    }
}

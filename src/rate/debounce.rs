/// Trailing-edge debounce over an arbitrary payload.
///
/// Every `signal` pushes the deadline out to `now + delay` and replaces the
/// pending value, so when the burst goes quiet exactly one value comes out of
/// `poll`: the last one.
#[derive(Debug)]
pub struct Debounce<T> {
    delay_ms: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms, pending: None }
    }

    pub fn signal(&mut self, now_ms: u64, value: T) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), value));
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if now_ms >= deadline => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// Drops the pending value, if any. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

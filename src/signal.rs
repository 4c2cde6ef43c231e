use crate::envelope::Capture;

/// A raw interaction as observed by a capture producer, before rate control.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Clicks, form activity, key combos, visibility: one signal, one event.
    Discrete(Capture),
    /// Pointer position in client coordinates. Throttled.
    PointerMove { x: f64, y: f64 },
    /// Viewport dimensions after a resize. Debounced.
    ViewportResize(Viewport),
}

impl From<Capture> for Signal {
    fn from(capture: Capture) -> Self {
        Signal::Discrete(capture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub window_width: u32,
    pub window_height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
}

/// Page lifecycle notifications from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLifecycle {
    Hidden,
    Visible,
    /// Page is being torn down. Last chance to ship anything.
    Unload,
}

/// Everything that can arrive on the driver's input channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Signal(Signal),
    Lifecycle(PageLifecycle),
}

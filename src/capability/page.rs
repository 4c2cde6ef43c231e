use parking_lot::RwLock;

use crate::pipeline::SignalSink;

/// Read-only view of the current document.
pub trait PageContext: Send + Sync {
    fn url(&self) -> String;
    fn title(&self) -> String;
    fn referrer(&self) -> String;
}

/// A page whose location can change underneath the pipeline (client-side navigation).
#[derive(Debug)]
pub struct StaticPage {
    url: RwLock<String>,
    title: RwLock<String>,
    referrer: String,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, title: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self {
            url: RwLock::new(url.into()),
            title: RwLock::new(title.into()),
            referrer: referrer.into(),
        }
    }

    pub fn navigate(&self, url: impl Into<String>, title: impl Into<String>) {
        *self.url.write() = url.into();
        *self.title.write() = title.into();
    }
}

impl PageContext for StaticPage {
    fn url(&self) -> String {
        self.url.read().clone()
    }

    fn title(&self) -> String {
        self.title.read().clone()
    }

    fn referrer(&self) -> String {
        self.referrer.clone()
    }
}

/// A capture producer: observes one class of UI interaction and feeds the
/// pipeline through the sink it is handed on attach.
///
/// Implementations own their event-listener wiring. They classify the element
/// before submitting (see `crate::producers`) and never learn whether delivery
/// succeeded.
pub trait DomEventSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn attach(&self, sink: SignalSink);

    /// Called once when the page is torn down.
    fn detach(&self) {}
}

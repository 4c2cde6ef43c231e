use anyhow::Context;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, timeout, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::sink::SignalSink;
use super::Pipeline;
use crate::capability::DomEventSource;
use crate::signal::{Input, PageLifecycle};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Async event loop around a [`Pipeline`].
///
/// Owns the signal channel, the dwell sampler cadence and the debounce timer.
/// All pipeline mutation happens on this one task.
pub struct PipelineDriver {
    pipeline: Pipeline,
    rx: mpsc::Receiver<Input>,
    // Dropped once producers are attached so the loop ends when they all go away.
    tx: Option<mpsc::Sender<Input>>,
    sources: Vec<Arc<dyn DomEventSource>>,
}

impl PipelineDriver {
    pub fn new(pipeline: Pipeline) -> Self {
        Self::with_capacity(pipeline, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(pipeline: Pipeline, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            pipeline,
            rx,
            tx: Some(tx),
            sources: Vec::new(),
        }
    }

    /// A sink for producers that are not registered as [`DomEventSource`]s.
    pub fn sink(&self) -> Option<SignalSink> {
        self.tx.clone().map(SignalSink::new)
    }

    pub fn register(&mut self, source: Arc<dyn DomEventSource>) {
        self.sources.push(source);
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Initializes the pipeline, attaches producers, resumes retrying events
    /// from a previous page lifetime, then runs until `Unload`, cancellation,
    /// or every sink is dropped.
    pub async fn run(mut self, shutdown: CancellationToken) -> anyhow::Result<()> {
        self.pipeline
            .config()
            .validate()
            .context("invalid pipeline configuration")?;

        self.pipeline.initialize();

        let tx = self.tx.take().context("pipeline driver already started")?;
        for source in &self.sources {
            source.attach(SignalSink::new(tx.clone()));
            info!(source = source.name(), "Attached capture producer");
        }
        drop(tx);

        self.pipeline.flush();

        let mut cadence = interval(Duration::from_millis(self.pipeline.config().sample_period_ms));
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately.
        cadence.tick().await;

        loop {
            let debounce_wait = self.pipeline.next_deadline_ms().map(|deadline| {
                let now = self.pipeline_now();
                Duration::from_millis(deadline.saturating_sub(now))
            });

            tokio::select! {
                _ = shutdown.cancelled() => {
                    self.pipeline.unload();
                    break;
                }
                _ = cadence.tick() => {
                    self.pipeline.sample_dwell();
                }
                _ = sleep(debounce_wait.unwrap_or_default()), if debounce_wait.is_some() => {
                    self.pipeline.fire_due();
                }
                input = self.rx.recv() => match input {
                    Some(Input::Signal(signal)) => {
                        self.pipeline.submit(signal);
                    }
                    Some(Input::Lifecycle(PageLifecycle::Unload)) | None => {
                        self.pipeline.unload();
                        break;
                    }
                    Some(Input::Lifecycle(lifecycle)) => self.pipeline.on_lifecycle(lifecycle),
                }
            }
        }

        for source in &self.sources {
            source.detach();
        }

        // Best effort: the host may tear us down before this completes.
        let grace = Duration::from_millis(self.pipeline.config().unload_grace_ms);
        if timeout(grace, self.pipeline.queue().settle()).await.is_err() {
            warn!(
                pending = self.pipeline.queue().in_flight(),
                "Unload grace period elapsed with deliveries in flight"
            );
        }
        info!(queued = self.pipeline.queue().len(), "Pipeline stopped");
        Ok(())
    }

    fn pipeline_now(&self) -> u64 {
        self.pipeline.clock.now_ms()
    }
}

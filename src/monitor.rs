//! Monitor runtime.
//!
//! The signal generator and the passive growth ticker run as two tasks that
//! only push inputs into one channel. A single worker task drains the channel
//! and owns the [`Coordinator`], so state mutation stays serialized no matter
//! how many runtime threads exist. Suggestion lookups run in a `JoinSet` owned
//! by the worker and report back through the same loop.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::core::alerts::model::AlertId;
use crate::core::config::Settings;
use crate::core::coordinator::{Coordinator, MonitorInput};
use crate::core::model::SignalEvent;
use crate::core::signals::SignalGenerator;
use crate::core::state::MonitorSnapshot;
use crate::core::suggestions::fetcher::{fetch_with_timeout, SuggestionError, SuggestionFetcher};
use crate::core::ticker::PeriodicTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("monitor has been shut down")]
    Closed,
}

/// Cloneable access for the rendering side: read snapshots, send intents.
#[derive(Clone)]
pub struct MonitorHandle {
    inbox: mpsc::UnboundedSender<MonitorInput>,
    snapshots: watch::Receiver<MonitorSnapshot>,
}

impl MonitorHandle {
    fn send(&self, input: MonitorInput) -> Result<(), MonitorError> {
        self.inbox.send(input).map_err(|_| MonitorError::Closed)
    }

    /// Feed one signal event, exactly as the generator would.
    pub fn tick(&self, event: SignalEvent) -> Result<(), MonitorError> {
        self.send(MonitorInput::Signal(event))
    }

    pub fn dismiss(&self, id: AlertId) -> Result<(), MonitorError> {
        self.send(MonitorInput::Dismiss(id))
    }

    pub fn request_suggestions(&self, id: AlertId) -> Result<(), MonitorError> {
        self.send(MonitorInput::RequestSuggestions(id))
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshots.clone()
    }
}

/// Owner of the running monitor. Dropping it tears everything down.
pub struct Monitor {
    handle: MonitorHandle,
    generator: SignalGenerator,
    passive: PeriodicTask,
    stop_tx: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Start the worker and both tickers. Must be called inside a tokio runtime.
    pub fn create(settings: &Settings, fetcher: Arc<dyn SuggestionFetcher>) -> Self {
        let coordinator = Coordinator::new(settings);
        let (snapshot_tx, snapshot_rx) = watch::channel(coordinator.snapshot());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let worker = tokio::spawn(run_worker(
            coordinator,
            inbox_rx,
            stop_rx,
            snapshot_tx,
            fetcher,
            settings.suggestions.timeout(),
        ));

        let mut generator = SignalGenerator::new(
            settings.signal_interval(),
            settings.need_probability,
            settings.signal_seed,
        );
        let signal_tx = inbox_tx.clone();
        generator.start(move |event| {
            let _ = signal_tx.send(MonitorInput::Signal(event));
        });

        let mut passive = PeriodicTask::new("passive growth", settings.passive_tick_interval());
        let tick_tx = inbox_tx.clone();
        passive.start(move || {
            let _ = tick_tx.send(MonitorInput::PassiveTick);
        });

        log::info!(
            "Monitor started: signals every {:?}, passive growth every {:?}, threshold {}",
            settings.signal_interval(),
            settings.passive_tick_interval(),
            settings.alert_threshold
        );

        Self {
            handle: MonitorHandle {
                inbox: inbox_tx,
                snapshots: snapshot_rx,
            },
            generator,
            passive,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    pub fn tick(&self, event: SignalEvent) -> Result<(), MonitorError> {
        self.handle.tick(event)
    }

    pub fn dismiss(&self, id: AlertId) -> Result<(), MonitorError> {
        self.handle.dismiss(id)
    }

    pub fn request_suggestions(&self, id: AlertId) -> Result<(), MonitorError> {
        self.handle.request_suggestions(id)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.handle.snapshot()
    }

    /// Stop both tickers, then the worker. In-flight lookups are dropped.
    pub async fn shutdown(mut self) {
        self.generator.stop();
        self.passive.stop();

        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                log::warn!("Monitor worker ended abnormally: {}", e);
            }
        }
        log::info!("Monitor shut down");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.generator.stop();
        self.passive.stop();
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

type FetchOutcome = (AlertId, Result<Vec<String>, SuggestionError>);

async fn run_worker(
    mut coordinator: Coordinator,
    mut inbox: mpsc::UnboundedReceiver<MonitorInput>,
    mut stop: oneshot::Receiver<()>,
    snapshots: watch::Sender<MonitorSnapshot>,
    fetcher: Arc<dyn SuggestionFetcher>,
    fetch_timeout: Duration,
) {
    let mut fetches: JoinSet<FetchOutcome> = JoinSet::new();

    loop {
        let input = tokio::select! {
            biased;
            _ = &mut stop => break,
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => match joined {
                Ok((alert_id, result)) => MonitorInput::SuggestionsReady { alert_id, result },
                Err(e) => {
                    // Single in-flight fetch, so the failed task belongs to the marked alert
                    match coordinator.state().suggestions().in_flight() {
                        Some(alert_id) => MonitorInput::SuggestionsReady {
                            alert_id,
                            result: Err(SuggestionError::FetchFailed(e.to_string())),
                        },
                        None => continue,
                    }
                }
            },
            received = inbox.recv() => match received {
                Some(input) => input,
                None => break,
            },
        };

        let output = coordinator.handle(input);

        if let Some(request) = output.fetch {
            let fetcher = Arc::clone(&fetcher);
            fetches.spawn(async move {
                let result = fetch_with_timeout(fetcher.as_ref(), request.need, fetch_timeout).await;
                (request.alert_id, result)
            });
        }

        let next = coordinator.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fetches.abort_all();
    log::debug!("Monitor worker stopped");
}

//! PollingController: drives all network activity of the dashboard
//!
//! Two states: Idle (nothing selected, no requests) and Polling (a fixed
//! period ticker refreshes the selected engine). A selection change fetches
//! immediately without resetting the ticker. Requests are never cancelled or
//! sequenced; whichever response lands last wins at the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::PredictionApi;
use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::log_collector::LogLine;
use crate::models::{DegradationSeries, EngineId, EngineMetrics, ModelMetrics, SystemStatus};
use crate::store::EngineStateStore;
use super::threading::{spawn_fetch, RepaintSignal};

/// Which backend call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Engines,
    Prediction,
    History,
    BackendStatus,
}

/// Discrete events delivered to the UI thread
#[derive(Clone, Debug)]
pub enum DashboardEvent {
    /// Periodic poll timer fired
    Tick,
    EnginesLoaded(Vec<EngineId>),
    PredictionReady {
        engine: EngineId,
        cycle: Option<u32>,
        metrics: EngineMetrics,
    },
    HistoryReady {
        engine: EngineId,
        series: DegradationSeries,
    },
    BackendStatus {
        status: Option<SystemStatus>,
        metrics: Option<ModelMetrics>,
    },
    FetchFailed {
        kind: FetchKind,
        engine: Option<EngineId>,
        error: FetchError,
    },
    /// Diagnostic line forwarded from the log collector
    Log(LogLine),
}

/// Polling lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling { engine: EngineId },
}

/// Issues every backend request and reports results as `DashboardEvent`s
pub struct PollingController {
    api: Arc<dyn PredictionApi>,
    events_tx: mpsc::Sender<DashboardEvent>,
    runtime: Handle,
    repaint: RepaintSignal,
    interval: Duration,
    standalone_health: bool,
    ticker: Option<JoinHandle<()>>,
    /// Set while a Tick sits in the channel; at most one is queued at a time
    tick_pending: Arc<AtomicBool>,
    requests_issued: u64,
}

impl PollingController {
    pub fn new(
        api: Arc<dyn PredictionApi>,
        events_tx: mpsc::Sender<DashboardEvent>,
        runtime: Handle,
        repaint: RepaintSignal,
        config: &DashboardConfig,
    ) -> Self {
        PollingController {
            api,
            events_tx,
            runtime,
            repaint,
            interval: config.poll_interval(),
            standalone_health: config.standalone_health,
            ticker: None,
            tick_pending: Arc::new(AtomicBool::new(false)),
            requests_issued: 0,
        }
    }

    /// Current state, derived from the store's selection
    pub fn state(&self, store: &EngineStateStore) -> PollState {
        match store.selected() {
            Some(engine) => PollState::Polling {
                engine: engine.clone(),
            },
            None => PollState::Idle,
        }
    }

    /// Number of fetch tasks started so far
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Start the periodic ticker. Calling it again is a no-op.
    ///
    /// The first tick fires one full interval after start; missed ticks are
    /// skipped rather than bursting. A tick is only sent once the previous
    /// one has been handled by `on_tick`.
    pub fn start_ticker(&mut self) {
        if self.is_ticking() {
            return;
        }
        let tx = self.events_tx.clone();
        let repaint = self.repaint.clone();
        let period = self.interval;
        let pending = self.tick_pending.clone();
        log::info!("[Poll] Ticker started ({} ms)", period.as_millis());
        self.ticker = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if pending.swap(true, Ordering::AcqRel) {
                    if tx.is_closed() {
                        break;
                    }
                    continue;
                }
                if tx.send(DashboardEvent::Tick).await.is_err() {
                    log::debug!("[Poll] Event channel closed, ticker stopping");
                    break;
                }
                repaint.request();
            }
        }));
    }

    /// Fetch the engine list.
    pub fn load_engines(&mut self) {
        let engines = self.api.list_engines();
        self.spawn("engines", async move {
            match engines.await {
                Ok(ids) => DashboardEvent::EnginesLoaded(ids),
                Err(error) => DashboardEvent::FetchFailed {
                    kind: FetchKind::Engines,
                    engine: None,
                    error,
                },
            }
        });
    }

    /// Fetch `/debug` and `/metrics` concurrently for the footer.
    pub fn load_backend_status(&mut self) {
        let status = self.api.get_system_status();
        let metrics = self.api.get_model_metrics();
        self.spawn("backend status", async move {
            let (status, metrics) = futures::join!(status, metrics);
            match (status, metrics) {
                (Err(error), Err(_)) => DashboardEvent::FetchFailed {
                    kind: FetchKind::BackendStatus,
                    engine: None,
                    error,
                },
                (status, metrics) => {
                    if let Err(e) = &status {
                        log::warn!("[Poll] Backend status unavailable: {}", e);
                    }
                    if let Err(e) = &metrics {
                        log::warn!("[Poll] Model metrics unavailable: {}", e);
                    }
                    DashboardEvent::BackendStatus {
                        status: status.ok(),
                        metrics: metrics.ok(),
                    }
                }
            }
        });
    }

    /// Select `engine` and fetch it right away: its history and a prediction.
    ///
    /// The ticker keeps its phase, so the next tick may follow quickly.
    pub fn on_selection_changed(&mut self, store: &mut EngineStateStore, engine: EngineId) {
        log::info!("[Poll] Selected {}", engine);
        store.select(&engine);
        self.request_history(engine.clone());
        let cycle = store.advance_cursor(&engine);
        self.request_prediction(engine, cycle);
    }

    /// Refresh the currently selected engine, if any.
    pub fn on_tick(&mut self, store: &mut EngineStateStore) {
        self.tick_pending.store(false, Ordering::Release);
        let Some(engine) = store.selected().cloned() else {
            return;
        };
        let cycle = store.advance_cursor(&engine);
        self.request_prediction(engine, cycle);
    }

    fn request_history(&mut self, engine: EngineId) {
        let history = self.api.get_history(&engine);
        self.spawn(format!("history {}", engine), async move {
            match history.await {
                Ok(series) => DashboardEvent::HistoryReady { engine, series },
                Err(error) => DashboardEvent::FetchFailed {
                    kind: FetchKind::History,
                    engine: Some(engine),
                    error,
                },
            }
        });
    }

    fn request_prediction(&mut self, engine: EngineId, cycle: Option<u32>) {
        let prediction = self.api.get_prediction(&engine, cycle);
        let health = self.standalone_health.then(|| self.api.get_health(&engine));
        self.spawn(format!("predict {}", engine), async move {
            let (prediction, health) = match health {
                Some(health) => {
                    let (p, h) = futures::join!(prediction, health);
                    (p, Some(h))
                }
                None => (prediction.await, None),
            };

            match prediction {
                Ok(mut metrics) => {
                    match health {
                        Some(Ok(value)) if metrics.health.is_none() => metrics.health = Some(value),
                        Some(Err(e)) => log::warn!("[Poll] Health fetch for {} failed: {}", engine, e),
                        _ => {}
                    }
                    DashboardEvent::PredictionReady {
                        engine,
                        cycle,
                        metrics,
                    }
                }
                Err(error) => DashboardEvent::FetchFailed {
                    kind: FetchKind::Prediction,
                    engine: Some(engine),
                    error,
                },
            }
        });
    }

    fn spawn<F>(&mut self, label: impl Into<String>, fut: F)
    where
        F: std::future::Future<Output = DashboardEvent> + Send + 'static,
    {
        self.requests_issued += 1;
        spawn_fetch(
            &self.runtime,
            label.into(),
            self.events_tx.clone(),
            self.repaint.clone(),
            fut,
        );
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

//! Application context: the single owner of dashboard state
//!
//! Constructed once at startup and alive for the whole process. Every
//! `DashboardEvent` is applied here, one at a time, on the UI thread. The
//! store is only mutated through this path; failed fetches are logged and
//! leave the last good values on screen.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::api::PredictionApi;
use crate::config::DashboardConfig;
use crate::models::{EngineId, ModelMetrics, SystemStatus};
use crate::store::EngineStateStore;
use super::controller::{DashboardEvent, FetchKind, PollState, PollingController};
use super::threading::RepaintSignal;
use super::view::EngineView;

/// Placeholder shown in the selector when the engine list cannot be loaded
pub const CONNECTION_FAILED_LABEL: &str = "Connection Failed";

/// Engine selector contents
#[derive(Debug, Clone, PartialEq)]
pub enum EngineListState {
    Loading,
    Loaded(Vec<EngineId>),
    ConnectionFailed,
}

/// Footer contents
#[derive(Debug, Clone, PartialEq)]
pub enum BackendInfo {
    Pending,
    Available {
        status: Option<SystemStatus>,
        metrics: Option<ModelMetrics>,
    },
    Unavailable,
}

pub struct DashboardContext {
    pub config: DashboardConfig,
    pub store: EngineStateStore,
    pub controller: PollingController,
    pub engines: EngineListState,
    pub backend: BackendInfo,
    /// Most recent diagnostic lines, oldest first
    pub logs: VecDeque<String>,
    pub failed_fetches: u64,
}

impl DashboardContext {
    pub fn new(
        config: DashboardConfig,
        api: Arc<dyn PredictionApi>,
        events_tx: mpsc::Sender<DashboardEvent>,
        runtime: Handle,
        repaint: RepaintSignal,
    ) -> Self {
        let controller = PollingController::new(api, events_tx, runtime, repaint, &config);
        DashboardContext {
            store: EngineStateStore::from_config(&config),
            controller,
            engines: EngineListState::Loading,
            backend: BackendInfo::Pending,
            logs: VecDeque::with_capacity(config.log_panel_lines.max(1)),
            failed_fetches: 0,
            config,
        }
    }

    /// Request the engine list and arm the poll timer.
    pub fn start(&mut self) {
        self.controller.load_engines();
        self.controller.start_ticker();
    }

    pub fn poll_state(&self) -> PollState {
        self.controller.state(&self.store)
    }

    pub fn selected(&self) -> Option<&EngineId> {
        self.store.selected()
    }

    /// User (or initial load) picked `engine`.
    ///
    /// Reselecting the current engine does nothing; any other choice fetches
    /// immediately.
    pub fn select_engine(&mut self, engine: EngineId) {
        if self.store.selected() == Some(&engine) {
            return;
        }
        if self.config.reset_forecast_on_switch {
            self.store.reset_forecast(&engine);
        }
        self.controller.on_selection_changed(&mut self.store, engine);
    }

    /// Apply one event. Returns true when the display may have changed.
    pub fn handle_event(&mut self, event: DashboardEvent) -> bool {
        match event {
            DashboardEvent::Tick => {
                self.controller.on_tick(&mut self.store);
                false
            }
            DashboardEvent::EnginesLoaded(ids) => {
                log::info!("[UI] Engine list loaded ({} engines)", ids.len());
                let first = ids.first().cloned();
                self.engines = EngineListState::Loaded(ids);
                self.controller.load_backend_status();
                if self.store.selected().is_none() {
                    if let Some(first) = first {
                        self.select_engine(first);
                    }
                }
                true
            }
            DashboardEvent::PredictionReady {
                engine,
                cycle,
                metrics,
            } => {
                match cycle {
                    Some(c) => log::debug!("[Store] {} @ cycle {}: RUL {:.1}", engine, c, metrics.rul),
                    None => log::debug!("[Store] {}: RUL {:.1}", engine, metrics.rul),
                }
                self.store.apply_prediction(&engine, cycle, metrics);
                self.store.selected() == Some(&engine)
            }
            DashboardEvent::HistoryReady { engine, series } => {
                log::debug!("[Store] History for {}: {} cycles", engine, series.len());
                self.store.apply_history(&engine, series);
                self.store.selected() == Some(&engine)
            }
            DashboardEvent::BackendStatus { status, metrics } => {
                self.backend = BackendInfo::Available { status, metrics };
                true
            }
            DashboardEvent::FetchFailed {
                kind,
                engine,
                error,
            } => {
                self.failed_fetches += 1;
                match kind {
                    FetchKind::Engines => {
                        log::error!("[UI] Failed to load engines: {}", error);
                        self.engines = EngineListState::ConnectionFailed;
                        true
                    }
                    FetchKind::BackendStatus => {
                        log::warn!("[UI] Backend status unavailable: {}", error);
                        self.backend = BackendInfo::Unavailable;
                        true
                    }
                    FetchKind::Prediction | FetchKind::History => {
                        let engine = engine.map(|e| e.to_string()).unwrap_or_default();
                        log::error!("[UI] {:?} fetch for {} failed: {}", kind, engine, error);
                        false
                    }
                }
            }
            DashboardEvent::Log(line) => {
                if self.logs.len() >= self.config.log_panel_lines.max(1) {
                    self.logs.pop_front();
                }
                self.logs.push_back(format!("[{}] {}", line.timestamp, line.message));
                true
            }
        }
    }

    /// Selector entries as `(engine, label)`; a failed load yields a single
    /// placeholder with no engine behind it.
    pub fn selector_options(&self) -> Vec<(Option<EngineId>, String)> {
        match &self.engines {
            EngineListState::Loading => vec![(None, "Loading...".to_string())],
            EngineListState::ConnectionFailed => vec![(None, CONNECTION_FAILED_LABEL.to_string())],
            EngineListState::Loaded(ids) => ids
                .iter()
                .map(|id| (Some(id.clone()), id.display_label()))
                .collect(),
        }
    }

    /// Projection of the selected engine, once it has a prediction
    pub fn selected_view(&self) -> Option<EngineView> {
        self.store
            .selected_entry()
            .and_then(|entry| EngineView::project(entry, &self.config))
    }
}

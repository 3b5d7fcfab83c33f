//! Engine State Store
//!
//! In-memory map from engine id to its latest metrics, rolling series,
//! degradation history and replay cursor. Entries are created lazily on first
//! use and are never removed, so reselecting an engine redisplays instantly.
//! Ids are not checked against the engine list; an unknown id simply gets its
//! own isolated entry.

pub mod cursor;
pub mod history;

use crate::config::DashboardConfig;
use crate::models::{clamp_health, DegradationSeries, EngineId, EngineMetrics};
use chrono::{DateTime, Local};
use std::collections::HashMap;

pub use cursor::SimulationCursor;
pub use history::RollingHistory;

/// Replay parameters applied to every engine's cursor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplaySettings {
    pub enabled: bool,
    pub lead_in: u32,
    pub rewind: u32,
}

impl From<&DashboardConfig> for ReplaySettings {
    fn from(config: &DashboardConfig) -> Self {
        ReplaySettings {
            enabled: config.simulate_cycles,
            lead_in: config.replay_lead_in,
            rewind: config.replay_rewind,
        }
    }
}

/// Cached state of one engine
#[derive(Clone, Debug)]
pub struct EngineEntry {
    pub metrics: Option<EngineMetrics>,
    /// Live RUL predictions, oldest first
    pub rul_history: RollingHistory,
    /// Clamped health values of the same polls, when health was known
    pub health_history: RollingHistory,
    pub degradation: Option<DegradationSeries>,
    pub cursor: Option<SimulationCursor>,
    /// Replay cycle the current `metrics` were predicted at
    pub cycle: Option<u32>,
    /// Predictions applied so far
    pub updates: u64,
    pub last_updated: Option<DateTime<Local>>,
}

impl EngineEntry {
    fn new(capacity: usize) -> Self {
        EngineEntry {
            metrics: None,
            rul_history: RollingHistory::new(capacity),
            health_history: RollingHistory::new(capacity),
            degradation: None,
            cursor: None,
            cycle: None,
            updates: 0,
            last_updated: None,
        }
    }
}

/// Process-wide engine state, owned by the application context
pub struct EngineStateStore {
    entries: HashMap<EngineId, EngineEntry>,
    selected: Option<EngineId>,
    capacity: usize,
    replay: ReplaySettings,
}

impl EngineStateStore {
    pub fn new(capacity: usize, replay: ReplaySettings) -> Self {
        EngineStateStore {
            entries: HashMap::new(),
            selected: None,
            capacity: capacity.max(1),
            replay,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.history_length, ReplaySettings::from(config))
    }

    /// Create an empty entry for `id` if none exists.
    pub fn ensure(&mut self, id: &EngineId) -> &mut EngineEntry {
        let capacity = self.capacity;
        self.entries.entry(id.clone()).or_insert_with(|| {
            log::debug!("[Store] Creating entry for {}", id);
            EngineEntry::new(capacity)
        })
    }

    /// Overwrite the current values for `id` and append to its rolling series.
    ///
    /// A prediction without health keeps the previously known health value.
    /// `cycle` is the replay cycle the prediction was requested for, if any.
    pub fn apply_prediction(
        &mut self,
        id: &EngineId,
        cycle: Option<u32>,
        mut metrics: EngineMetrics,
    ) {
        let entry = self.ensure(id);
        if metrics.health.is_none() {
            metrics.health = entry.metrics.as_ref().and_then(|m| m.health);
        }

        entry.rul_history.push(metrics.rul);
        if let Some(health) = metrics.health {
            entry.health_history.push(clamp_health(health));
        }
        entry.metrics = Some(metrics);
        entry.cycle = cycle;
        entry.updates += 1;
        entry.last_updated = Some(Local::now());
    }

    /// Store the full degradation series and (re)base the replay cursor.
    ///
    /// The cursor is kept when the series still ends at the same cycle, so a
    /// reselected engine resumes where it left off.
    pub fn apply_history(&mut self, id: &EngineId, series: DegradationSeries) {
        let replay = self.replay;
        let entry = self.ensure(id);
        if replay.enabled {
            match series.max_cycle() {
                Some(max) if entry.cursor.map(|c| c.max_cycle()) != Some(max) => {
                    let cursor = SimulationCursor::new(max, replay.lead_in, replay.rewind);
                    log::debug!(
                        "[Store] Replay cursor for {} starts at cycle {} of {}",
                        id,
                        cursor.current(),
                        max
                    );
                    entry.cursor = Some(cursor);
                }
                Some(_) => {}
                None => entry.cursor = None,
            }
        }
        entry.degradation = Some(series);
    }

    /// Advance the replay cursor of `id`, if it has one, and return the new cycle.
    pub fn advance_cursor(&mut self, id: &EngineId) -> Option<u32> {
        self.entries
            .get_mut(id)
            .and_then(|e| e.cursor.as_mut())
            .map(SimulationCursor::advance)
    }

    /// Mark `id` as the engine being polled and rendered. Other entries are kept.
    pub fn select(&mut self, id: &EngineId) {
        self.selected = Some(id.clone());
    }

    pub fn selected(&self) -> Option<&EngineId> {
        self.selected.as_ref()
    }

    /// Clear only the live RUL series of `id`.
    pub fn reset_forecast(&mut self, id: &EngineId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.rul_history.clear();
        }
    }

    pub fn get(&self, id: &EngineId) -> Option<&EngineEntry> {
        self.entries.get(id)
    }

    /// Entry of the selected engine, if it has one yet.
    pub fn selected_entry(&self) -> Option<&EngineEntry> {
        self.selected.as_ref().and_then(|id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay() -> ReplaySettings {
        ReplaySettings {
            enabled: true,
            lead_in: 100,
            rewind: 50,
        }
    }

    fn metrics(rul: f64, health: Option<f64>) -> EngineMetrics {
        EngineMetrics {
            rul,
            rmse: 5.0,
            secondary: Vec::new(),
            health,
            window_size: None,
            attention: None,
        }
    }

    fn series(last: u32) -> DegradationSeries {
        DegradationSeries {
            cycles: (1..=last).collect(),
            health: (1..=last).map(|c| 100.0 - c as f64 * 0.3).collect(),
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.ensure(&id);
        store.ensure(&id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_apply_prediction_overwrites_and_appends() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_prediction(&id, None, metrics(120.0, Some(85.0)));
        store.apply_prediction(&id, None, metrics(119.0, Some(84.0)));

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.metrics.as_ref().unwrap().rul, 119.0);
        assert_eq!(entry.rul_history.to_vec(), vec![120.0, 119.0]);
        assert_eq!(entry.health_history.to_vec(), vec![85.0, 84.0]);
        assert_eq!(entry.updates, 2);
        assert!(entry.last_updated.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_health_keeps_previous_value() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_prediction(&id, None, metrics(120.0, Some(85.0)));
        store.apply_prediction(&id, None, metrics(118.0, None));
        let entry = store.get(&id).unwrap();
        assert_eq!(entry.metrics.as_ref().unwrap().health, Some(85.0));
    }

    #[test]
    fn test_health_history_is_clamped() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_prediction(&id, None, metrics(10.0, Some(-5.0)));
        store.apply_prediction(&id, None, metrics(10.0, Some(140.0)));
        assert_eq!(store.get(&id).unwrap().health_history.to_vec(), vec![0.0, 100.0]);
        // Raw value is retained for the record; display clamps it
        assert_eq!(store.get(&id).unwrap().metrics.as_ref().unwrap().health, Some(140.0));
    }

    #[test]
    fn test_rolling_history_capped() {
        let mut store = EngineStateStore::new(3, replay());
        let id = EngineId::from("engine1");
        for rul in [5.0, 4.0, 3.0, 2.0, 1.0] {
            store.apply_prediction(&id, None, metrics(rul, None));
        }
        assert_eq!(store.get(&id).unwrap().rul_history.to_vec(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_select_keeps_other_entries() {
        let mut store = EngineStateStore::new(10, replay());
        let a = EngineId::from("engine1");
        let b = EngineId::from("engine2");
        store.select(&a);
        store.apply_prediction(&a, None, metrics(100.0, None));
        store.select(&b);
        assert_eq!(store.selected(), Some(&b));
        assert!(store.selected_entry().is_none());
        assert_eq!(store.get(&a).unwrap().rul_history.len(), 1);
    }

    #[test]
    fn test_reset_forecast_only_clears_rul() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_prediction(&id, None, metrics(100.0, Some(90.0)));
        store.apply_history(&id, series(150));
        store.reset_forecast(&id);
        let entry = store.get(&id).unwrap();
        assert!(entry.rul_history.is_empty());
        assert_eq!(entry.health_history.len(), 1);
        assert!(entry.metrics.is_some());
        assert!(entry.degradation.is_some());
    }

    #[test]
    fn test_history_bases_cursor() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        assert_eq!(store.advance_cursor(&id), None);
        store.apply_history(&id, series(192));
        assert_eq!(store.get(&id).unwrap().cursor.unwrap().current(), 92);
        assert_eq!(store.advance_cursor(&id), Some(93));
    }

    #[test]
    fn test_same_history_keeps_cursor_position() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_history(&id, series(192));
        store.advance_cursor(&id);
        store.advance_cursor(&id);
        store.apply_history(&id, series(192));
        assert_eq!(store.get(&id).unwrap().cursor.unwrap().current(), 94);

        store.apply_history(&id, series(250));
        assert_eq!(store.get(&id).unwrap().cursor.unwrap().current(), 150);
    }

    #[test]
    fn test_displayed_cycle_follows_applied_prediction() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_history(&id, series(192));
        let requested = store.advance_cursor(&id);
        store.apply_prediction(&id, requested, metrics(80.0, None));
        assert_eq!(store.get(&id).unwrap().cycle, Some(93));

        // A tick whose request fails still advances the cursor
        store.advance_cursor(&id);
        let entry = store.get(&id).unwrap();
        assert_eq!(entry.cursor.unwrap().current(), 94);
        assert_eq!(entry.cycle, Some(93));
    }

    #[test]
    fn test_replay_disabled_never_creates_cursor() {
        let mut store = EngineStateStore::new(
            10,
            ReplaySettings {
                enabled: false,
                ..replay()
            },
        );
        let id = EngineId::from("engine1");
        store.apply_history(&id, series(192));
        assert!(store.get(&id).unwrap().cursor.is_none());
        assert!(store.get(&id).unwrap().degradation.is_some());
    }

    #[test]
    fn test_empty_history_drops_cursor() {
        let mut store = EngineStateStore::new(10, replay());
        let id = EngineId::from("engine1");
        store.apply_history(&id, series(192));
        store.apply_history(&id, DegradationSeries::default());
        assert!(store.get(&id).unwrap().cursor.is_none());
    }
}

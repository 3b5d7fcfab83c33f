//! RUL Dashboard
//!
//! Desktop client for a remaining-useful-life prediction backend. It lists
//! the monitored engines, polls the selected engine's prediction on a fixed
//! period, caches per-engine series in memory and renders them with egui.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Wire payloads and validated domain types
//! - **config**: Settings file and defaults
//! - **api**: Fetch client for the backend HTTP API
//! - **store**: Per-engine state (rolling series, replay cursor)
//! - **ui**: Polling controller, view projection and egui rendering
//! - **log_collector**: Disk and Diagnostics-panel log sink

#![allow(dead_code)]

pub mod error;
pub mod models;

pub mod config;

pub mod api;

pub mod store;

pub mod ui;

// Robust, decoupled logging system
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AppError, ConfigError, FetchError, Result};

pub use models::{
    AttentionMatrix, DegradationSeries, EngineId, EngineMetrics, ModelMetrics,
    SecondaryEstimate, SystemStatus,
};

pub use config::{DashboardConfig, SettingsManager};

pub use api::{HttpPredictionApi, PredictionApi};

pub use store::{EngineEntry, EngineStateStore, RollingHistory, SimulationCursor};

pub use ui::{DashboardApp, DashboardContext, DashboardEvent, PollState, PollingController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_error_reexport() {
        let _: Result<i32> = Ok(42);
    }

    #[test]
    fn test_models_reexport() {
        let id = EngineId::new("engine3");
        assert_eq!(id.display_label(), "ENGINE3");
    }
}

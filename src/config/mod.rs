//! Configuration management for the RUL Dashboard
//!
//! `DashboardConfig` is the process-wide configuration surface. It is loaded
//! once at startup and never mutated afterwards.
//!
//! The `SettingsManager` provides access to the persisted file:
//! - Reads `~/.config/rul-dashboard/settings.json` (or an explicit path)
//! - Falls back to defaults when the file is missing or unreadable
//! - Validates ranges before handing the config to the application

pub mod loader;

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dashboard configuration
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:5000`
    pub api_base: String,
    pub poll_interval_ms: u64,
    /// Rolling-history capacity (`H`)
    pub history_length: usize,
    /// Energy ring normalization constant
    pub max_rul: f64,
    pub forecast_axis_max: f64,
    pub health_axis_max: f64,
    /// Minimum opacity of an attention heatmap cell
    pub heatmap_floor: f64,
    /// Replay the engine's dataset cycle by cycle once its history is known
    pub simulate_cycles: bool,
    pub replay_lead_in: u32,
    pub replay_rewind: u32,
    /// Fetch `/health/{id}` alongside every prediction
    pub standalone_health: bool,
    /// Clear the live RUL series of the newly selected engine on every switch
    pub reset_forecast_on_switch: bool,
    /// Per-request timeout; 0 disables it
    pub request_timeout_ms: u64,
    pub log_panel_lines: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            api_base: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 2000,
            history_length: 50,
            max_rul: 300.0,
            forecast_axis_max: 300.0,
            health_axis_max: 100.0,
            heatmap_floor: 0.1,
            simulate_cycles: true,
            replay_lead_in: 100,
            replay_rewind: 50,
            standalone_health: false,
            reset_forecast_on_switch: false,
            request_timeout_ms: 0,
            log_panel_lines: 200,
        }
    }
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    /// Base URL without trailing slashes
    pub fn api_root(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "api_base must start with http:// or https://, got '{}'",
                self.api_base
            )));
        }
        if self.poll_interval_ms < 100 {
            return Err(ConfigError::ValidationFailed(format!(
                "poll_interval_ms must be at least 100, got {}",
                self.poll_interval_ms
            )));
        }
        if self.history_length == 0 {
            return Err(ConfigError::ValidationFailed(
                "history_length must be at least 1".to_string(),
            ));
        }
        if !(self.max_rul.is_finite() && self.max_rul > 0.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "max_rul must be positive, got {}",
                self.max_rul
            )));
        }
        if !(self.forecast_axis_max > 0.0 && self.health_axis_max > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "chart axis maxima must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.heatmap_floor) {
            return Err(ConfigError::ValidationFailed(format!(
                "heatmap_floor must be in [0, 1), got {}",
                self.heatmap_floor
            )));
        }
        Ok(())
    }
}

/// Settings manager for loading and persisting `DashboardConfig`
pub struct SettingsManager;

impl SettingsManager {
    /// Load from the global settings path, or return defaults if the file doesn't exist
    ///
    /// ERROR HANDLING: If deserialization or validation fails, logs a warning and
    /// returns defaults instead of aborting startup.
    pub fn load() -> Result<DashboardConfig, ConfigError> {
        let path = loader::get_global_settings_path()?;
        Ok(Self::load_from(&path))
    }

    /// Load from an explicit path with the same fallback rules as `load()`
    pub fn load_from(path: &Path) -> DashboardConfig {
        match loader::load_config_from_file(path) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    log::info!("[Config] Loaded settings from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("[Config] {} invalid ({}), using defaults", path.display(), e);
                    DashboardConfig::default()
                }
            },
            Err(ConfigError::FileNotFound(_)) => {
                log::info!("[Config] No settings at {}, using defaults", path.display());
                DashboardConfig::default()
            }
            Err(e) => {
                log::warn!("[Config] Failed to read {}: {}, using defaults", path.display(), e);
                DashboardConfig::default()
            }
        }
    }

    /// Persist to the global settings path, returning where it was written
    pub fn save(config: &DashboardConfig) -> Result<PathBuf, ConfigError> {
        let path = loader::get_global_settings_path()?;
        Self::save_to(config, &path)?;
        Ok(path)
    }

    /// Persist to an explicit path. Invalid settings are refused.
    pub fn save_to(config: &DashboardConfig, path: &Path) -> Result<(), ConfigError> {
        config.validate()?;
        loader::save_config_to_file(config, path)?;
        log::info!("[Config] Saved settings to {}", path.display());
        Ok(())
    }
}

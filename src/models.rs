//! Core data structures for the RUL Dashboard.
//!
//! Wire payloads mirror the backend's JSON schemas exactly; domain types are
//! produced from them at the Fetch Client boundary. Missing optional fields
//! stay `None` and are never coerced to zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque engine identifier supplied by the backend engine list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> Self {
        EngineId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label shown in the engine selector (`engine1` -> `ENGINE1`).
    pub fn display_label(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EngineId {
    fn from(s: &str) -> Self {
        EngineId(s.to_string())
    }
}

impl From<String> for EngineId {
    fn from(s: String) -> Self {
        EngineId(s)
    }
}

// ============================================================================
// WIRE PAYLOADS
// ============================================================================

/// Response of `GET /predict/{id}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub rul_combined: f64,
    pub rmse: f64,
    #[serde(default)]
    pub rul_xgb: Option<f64>,
    #[serde(default)]
    pub rul_transformer: Option<f64>,
    #[serde(default)]
    pub rmse_xgb: Option<f64>,
    #[serde(default)]
    pub rmse_transformer: Option<f64>,
    #[serde(default)]
    pub window: Option<f64>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub attention: Option<Vec<Vec<f64>>>,
}

/// Response of `GET /history/{id}`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub cycles: Vec<u32>,
    #[serde(default)]
    pub health: Vec<f64>,
}

/// Response of `GET /health/{id}`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthPayload {
    pub health: f64,
}

/// Response of `GET /debug`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub num_engines: usize,
    pub input_dim: usize,
    pub transformer_loaded: bool,
    pub xgboost_loaded: bool,
}

/// Response of `GET /metrics`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
}

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// Output of one auxiliary estimator, informational only.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryEstimate {
    pub model: &'static str,
    pub rul: Option<f64>,
    pub rmse: Option<f64>,
}

/// Rectangular matrix of non-negative attention weights, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct AttentionMatrix {
    rows: usize,
    cols: usize,
    weights: Vec<f64>,
}

impl AttentionMatrix {
    /// Build from nested rows.
    ///
    /// Returns `None` for an empty matrix, an empty first row, ragged rows or
    /// non-finite weights. Negative weights are clamped to zero.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 {
            return None;
        }
        let mut weights = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return None;
            }
            for &w in row {
                if !w.is_finite() {
                    return None;
                }
                weights.push(w.max(0.0));
            }
        }
        Some(AttentionMatrix {
            rows: rows.len(),
            cols,
            weights,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.weights.get(row * self.cols + col).copied()
    }

    /// Largest weight in the matrix (0.0 when every weight is zero).
    pub fn max_weight(&self) -> f64 {
        self.weights.iter().fold(0.0_f64, |a, &b| a.max(b))
    }
}

/// Latest snapshot of a single engine's prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineMetrics {
    /// Remaining useful life in operational cycles, never negative
    pub rul: f64,
    /// Error magnitude of the combined prediction, never negative
    pub rmse: f64,
    pub secondary: Vec<SecondaryEstimate>,
    /// Raw backend health; clamped only at display time
    pub health: Option<f64>,
    pub window_size: Option<f64>,
    pub attention: Option<AttentionMatrix>,
}

impl EngineMetrics {
    /// Validate a prediction payload.
    ///
    /// Non-finite `rul_combined` or `rmse` is rejected; negative values are
    /// floored at zero. A malformed attention matrix is dropped (treated as
    /// absent) rather than failing the whole prediction.
    pub fn from_payload(payload: PredictionPayload) -> Result<Self, String> {
        if !payload.rul_combined.is_finite() {
            return Err(format!("rul_combined is not finite: {}", payload.rul_combined));
        }
        if !payload.rmse.is_finite() {
            return Err(format!("rmse is not finite: {}", payload.rmse));
        }

        let attention = match payload.attention.as_deref() {
            Some(rows) => {
                let matrix = AttentionMatrix::from_rows(rows);
                if matrix.is_none() && !rows.is_empty() {
                    log::warn!("[API] Discarding malformed attention matrix ({} rows)", rows.len());
                }
                matrix
            }
            None => None,
        };

        Ok(EngineMetrics {
            rul: payload.rul_combined.max(0.0),
            rmse: payload.rmse.max(0.0),
            secondary: vec![
                SecondaryEstimate {
                    model: "XGBoost",
                    rul: finite(payload.rul_xgb),
                    rmse: finite(payload.rmse_xgb),
                },
                SecondaryEstimate {
                    model: "Transformer",
                    rul: finite(payload.rul_transformer),
                    rmse: finite(payload.rmse_transformer),
                },
            ],
            health: finite(payload.health),
            window_size: finite(payload.window),
            attention,
        })
    }

    /// Errors reported by the auxiliary estimators that supplied one.
    pub fn secondary_rmse(&self) -> Vec<f64> {
        self.secondary.iter().filter_map(|s| s.rmse).collect()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Clamp a raw health score into `[0, 100]`. NaN maps to 0.
pub fn clamp_health(health: f64) -> f64 {
    if health.is_nan() {
        0.0
    } else {
        health.clamp(0.0, 100.0)
    }
}

/// Full historical health trend of one engine, as returned by `/history`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DegradationSeries {
    pub cycles: Vec<u32>,
    pub health: Vec<f64>,
}

impl DegradationSeries {
    /// Pair cycles with health values; extra trailing values on either side are dropped.
    pub fn from_payload(payload: HistoryPayload) -> Self {
        let len = payload.cycles.len().min(payload.health.len());
        if payload.cycles.len() != payload.health.len() {
            log::warn!(
                "[API] History length mismatch (cycles={}, health={}), truncating to {}",
                payload.cycles.len(),
                payload.health.len(),
                len
            );
        }
        let mut cycles = payload.cycles;
        let mut health = payload.health;
        cycles.truncate(len);
        health.truncate(len);
        DegradationSeries { cycles, health }
    }

    /// Last cycle present in the engine's history.
    pub fn max_cycle(&self) -> Option<u32> {
        self.cycles.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> PredictionPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_engine_id_label() {
        let id = EngineId::from("engine1");
        assert_eq!(id.display_label(), "ENGINE1");
        assert_eq!(id.as_str(), "engine1");
    }

    #[test]
    fn test_engine_list_deserializes_as_strings() {
        let ids: Vec<EngineId> = serde_json::from_str(r#"["engine1","engine2"]"#).unwrap();
        assert_eq!(ids, vec![EngineId::from("engine1"), EngineId::from("engine2")]);
    }

    #[test]
    fn test_minimal_prediction_leaves_optionals_absent() {
        let metrics =
            EngineMetrics::from_payload(payload(r#"{"rul_combined": 120, "rmse": 8}"#)).unwrap();
        assert_eq!(metrics.rul, 120.0);
        assert_eq!(metrics.rmse, 8.0);
        assert_eq!(metrics.health, None);
        assert_eq!(metrics.window_size, None);
        assert!(metrics.attention.is_none());
        assert!(metrics.secondary_rmse().is_empty());
    }

    #[test]
    fn test_full_prediction() {
        let metrics = EngineMetrics::from_payload(payload(
            r#"{"rul_combined": 97.5, "rmse": 12.1, "rmse_xgb": 14.2, "rmse_transformer": 13.0,
                "rul_xgb": 95.0, "window": 30, "health": 64.0,
                "attention": [[0.1, 0.9], [0.5, 0.5]]}"#,
        ))
        .unwrap();
        assert_eq!(metrics.secondary_rmse(), vec![14.2, 13.0]);
        assert_eq!(metrics.secondary[0].rul, Some(95.0));
        assert_eq!(metrics.secondary[1].rul, None);
        assert_eq!(metrics.window_size, Some(30.0));
        let attention = metrics.attention.unwrap();
        assert_eq!((attention.rows(), attention.cols()), (2, 2));
        assert_eq!(attention.get(0, 1), Some(0.9));
        assert_eq!(attention.max_weight(), 0.9);
    }

    #[test]
    fn test_negative_rul_floored() {
        let metrics =
            EngineMetrics::from_payload(payload(r#"{"rul_combined": -3, "rmse": 2}"#)).unwrap();
        assert_eq!(metrics.rul, 0.0);
    }

    #[test]
    fn test_ragged_attention_is_absent() {
        let metrics = EngineMetrics::from_payload(payload(
            r#"{"rul_combined": 50, "rmse": 2, "attention": [[0.1, 0.2], [0.3]]}"#,
        ))
        .unwrap();
        assert!(metrics.attention.is_none());
    }

    #[test]
    fn test_empty_attention_is_absent() {
        assert!(AttentionMatrix::from_rows(&[]).is_none());
        assert!(AttentionMatrix::from_rows(&[vec![]]).is_none());
    }

    #[test]
    fn test_attention_negative_weights_clamped() {
        let m = AttentionMatrix::from_rows(&[vec![-0.5, 0.25]]).unwrap();
        assert_eq!(m.get(0, 0), Some(0.0));
        assert_eq!(m.get(1, 0), None);
    }

    #[test]
    fn test_history_truncates_to_shortest() {
        let series = DegradationSeries::from_payload(HistoryPayload {
            cycles: vec![1, 2, 3],
            health: vec![99.0, 98.0],
        });
        assert_eq!(series.len(), 2);
        assert_eq!(series.max_cycle(), Some(2));
    }

    #[test]
    fn test_clamp_health_bounds() {
        assert_eq!(clamp_health(-5.0), 0.0);
        assert_eq!(clamp_health(101.0), 100.0);
        assert_eq!(clamp_health(f64::NAN), 0.0);
        assert_eq!(clamp_health(42.5), 42.5);
    }

    #[test]
    fn test_system_status_defaults_missing_fields() {
        let status: SystemStatus = serde_json::from_str(r#"{"num_engines": 100}"#).unwrap();
        assert_eq!(status.num_engines, 100);
        assert!(!status.transformer_loaded);
    }
}

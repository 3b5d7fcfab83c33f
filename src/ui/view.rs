/// View Projections
///
/// Pure functions from engine state to display values: hero readout, health
/// gauge, status pill, energy ring, chart series and heatmap cells. Nothing
/// here touches the network or mutates state; the egui widgets only paint
/// what these functions return.

use crate::config::DashboardConfig;
use crate::models::{AttentionMatrix, DegradationSeries, EngineMetrics};

pub use crate::models::clamp_health;
use crate::store::{EngineEntry, RollingHistory};

/// Degrees swept by a full semicircular gauge
pub const GAUGE_SWEEP_DEGREES: f64 = 180.0;

/// Three-tier health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Critical,
    Warning,
    Nominal,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "CRITICAL",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Nominal => "NOMINAL",
        }
    }
}

/// `< 40` critical, `< 70` warning, otherwise nominal. No hysteresis.
pub fn classify_health(health: f64) -> HealthStatus {
    let health = clamp_health(health);
    if health < 40.0 {
        HealthStatus::Critical
    } else if health < 70.0 {
        HealthStatus::Warning
    } else {
        HealthStatus::Nominal
    }
}

/// Formatted RUL readout with its error band
#[derive(Debug, Clone, PartialEq)]
pub struct HeroReadout {
    pub rul_text: String,
    pub rmse_text: String,
    pub range_text: String,
    pub error_text: String,
    pub lower: f64,
    pub upper: f64,
}

/// Error band is `rul ± rmse` with the lower bound floored at zero.
pub fn hero_readout(rul: f64, rmse: f64) -> HeroReadout {
    let lower = (rul - rmse).max(0.0);
    let upper = rul + rmse;
    HeroReadout {
        rul_text: format!("{:.1}", rul),
        rmse_text: format!("± {:.1}", rmse),
        range_text: format!("{:.1} – {:.1}", lower, upper),
        error_text: format!("Estimated Error: ± {:.1} cycles", rmse),
        lower,
        upper,
    }
}

/// Semicircular health gauge
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    /// Clamped health, 0..=100
    pub percent: f64,
    /// Filled arc, `percent * 1.8`
    pub degrees: f64,
    pub label: String,
    pub status: HealthStatus,
}

pub fn health_gauge(health: f64) -> GaugeView {
    let percent = clamp_health(health);
    GaugeView {
        percent,
        degrees: percent / 100.0 * GAUGE_SWEEP_DEGREES,
        label: format!("{:.0}%", percent),
        status: classify_health(percent),
    }
}

/// Color band of the energy ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingTone {
    Nominal,
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRing {
    /// `clamp(rul / max_rul, 0, 1)`
    pub fraction: f64,
    pub tone: RingTone,
}

/// Above 0.6 nominal, above 0.3 caution, otherwise critical.
pub fn energy_ring(rul: f64, max_rul: f64) -> EnergyRing {
    let fraction = if max_rul > 0.0 && !rul.is_nan() {
        (rul / max_rul).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let tone = if fraction > 0.6 {
        RingTone::Nominal
    } else if fraction > 0.3 {
        RingTone::Caution
    } else {
        RingTone::Critical
    };
    EnergyRing { fraction, tone }
}

/// Points of a line chart plus its fixed y-axis range
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<[f64; 2]>,
    pub y_max: f64,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Live RUL predictions, x = arrival index
pub fn forecast_series(history: &RollingHistory, y_max: f64) -> ChartSeries {
    ChartSeries {
        points: history
            .iter()
            .enumerate()
            .map(|(i, rul)| [i as f64, rul])
            .collect(),
        y_max,
    }
}

/// Recorded health trend, x = cycle
pub fn degradation_series(series: &DegradationSeries, y_max: f64) -> ChartSeries {
    ChartSeries {
        points: series
            .cycles
            .iter()
            .zip(&series.health)
            .map(|(&cycle, &health)| [cycle as f64, health])
            .collect(),
        y_max,
    }
}

/// Attention heatmap contents
#[derive(Debug, Clone, PartialEq)]
pub enum HeatmapView {
    /// The backend supplied no usable attention matrix
    NoData,
    Grid {
        rows: usize,
        cols: usize,
        /// Row-major cell opacity, each in `[floor, 1]`
        alphas: Vec<f64>,
    },
}

/// `floor + (value / max) * (1 - floor)`; an all-zero matrix renders at the floor.
pub fn cell_alpha(value: f64, max: f64, floor: f64) -> f64 {
    let scaled = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    // Same line as floor + scaled * (1 - floor), exact at both ends
    scaled + floor * (1.0 - scaled)
}

pub fn heatmap(attention: Option<&AttentionMatrix>, floor: f64) -> HeatmapView {
    let Some(matrix) = attention else {
        return HeatmapView::NoData;
    };
    let max = matrix.max_weight();
    let mut alphas = Vec::with_capacity(matrix.rows() * matrix.cols());
    for row in 0..matrix.rows() {
        for col in 0..matrix.cols() {
            let value = matrix.get(row, col).unwrap_or(0.0);
            alphas.push(cell_alpha(value, max, floor));
        }
    }
    HeatmapView::Grid {
        rows: matrix.rows(),
        cols: matrix.cols(),
        alphas,
    }
}

/// Model performance rows, e.g. `("XGBoost RMSE", "14.20")`
pub fn model_rows(metrics: &EngineMetrics) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for estimate in &metrics.secondary {
        if let Some(rmse) = estimate.rmse {
            rows.push((format!("{} RMSE", estimate.model), format!("{:.2}", rmse)));
        }
        if let Some(rul) = estimate.rul {
            rows.push((format!("{} RUL", estimate.model), format!("{:.1}", rul)));
        }
    }
    if let Some(window) = metrics.window_size {
        rows.push(("Window".to_string(), format!("{:.0}", window)));
    }
    rows
}

/// Everything the dashboard shows for the selected engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineView {
    pub hero: HeroReadout,
    /// `None` until the backend has reported a health value
    pub gauge: Option<GaugeView>,
    pub ring: EnergyRing,
    pub forecast: ChartSeries,
    pub health_trend: Vec<f64>,
    pub degradation: Option<ChartSeries>,
    pub heatmap: HeatmapView,
    pub model_rows: Vec<(String, String)>,
    /// Replay cycle of the prediction on screen
    pub cycle: Option<u32>,
    pub updates: u64,
    pub updated_at: Option<String>,
}

impl EngineView {
    /// Project an engine entry. Returns `None` before its first prediction.
    pub fn project(entry: &EngineEntry, config: &DashboardConfig) -> Option<Self> {
        let metrics = entry.metrics.as_ref()?;
        Some(EngineView {
            hero: hero_readout(metrics.rul, metrics.rmse),
            gauge: metrics.health.map(health_gauge),
            ring: energy_ring(metrics.rul, config.max_rul),
            forecast: forecast_series(&entry.rul_history, config.forecast_axis_max),
            health_trend: entry.health_history.to_vec(),
            degradation: entry
                .degradation
                .as_ref()
                .filter(|s| !s.is_empty())
                .map(|s| degradation_series(s, config.health_axis_max)),
            heatmap: heatmap(metrics.attention.as_ref(), config.heatmap_floor),
            model_rows: model_rows(metrics),
            cycle: entry.cycle,
            updates: entry.updates,
            updated_at: entry
                .last_updated
                .map(|t| t.format("%H:%M:%S").to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundaries() {
        assert_eq!(classify_health(39.9), HealthStatus::Critical);
        assert_eq!(classify_health(40.0), HealthStatus::Warning);
        assert_eq!(classify_health(69.9), HealthStatus::Warning);
        assert_eq!(classify_health(70.0), HealthStatus::Nominal);
        assert_eq!(classify_health(-5.0), HealthStatus::Critical);
        assert_eq!(classify_health(250.0), HealthStatus::Nominal);
    }

    #[test]
    fn test_hero_readout() {
        let hero = hero_readout(120.0, 8.0);
        assert_eq!(hero.rul_text, "120.0");
        assert_eq!(hero.rmse_text, "± 8.0");
        assert_eq!(hero.range_text, "112.0 – 128.0");
        assert_eq!(hero.error_text, "Estimated Error: ± 8.0 cycles");
    }

    #[test]
    fn test_hero_lower_bound_never_negative() {
        let hero = hero_readout(5.0, 12.5);
        assert_eq!(hero.lower, 0.0);
        assert_eq!(hero.upper, 17.5);
        assert_eq!(hero.range_text, "0.0 – 17.5");
    }

    #[test]
    fn test_gauge_mapping() {
        let gauge = health_gauge(85.0);
        assert_eq!(gauge.percent, 85.0);
        assert!((gauge.degrees - 153.0).abs() < 1e-9);
        assert_eq!(gauge.label, "85%");
        assert_eq!(gauge.status, HealthStatus::Nominal);

        let empty = health_gauge(-5.0);
        assert_eq!(empty.label, "0%");
        assert_eq!(empty.degrees, 0.0);

        let full = health_gauge(180.0);
        assert_eq!(full.label, "100%");
        assert_eq!(full.degrees, GAUGE_SWEEP_DEGREES);
    }

    #[test]
    fn test_energy_ring_tones() {
        assert_eq!(energy_ring(0.0, 300.0).fraction, 0.0);
        assert_eq!(energy_ring(450.0, 300.0).fraction, 1.0);
        assert_eq!(energy_ring(300.0, 300.0).tone, RingTone::Nominal);
        assert_eq!(energy_ring(181.0, 300.0).tone, RingTone::Nominal);
        assert_eq!(energy_ring(180.0, 300.0).tone, RingTone::Caution);
        assert_eq!(energy_ring(91.0, 300.0).tone, RingTone::Caution);
        assert_eq!(energy_ring(90.0, 300.0).tone, RingTone::Critical);
    }

    #[test]
    fn test_cell_alpha_floor() {
        assert_eq!(cell_alpha(0.0, 0.8, 0.1), 0.1);
        assert_eq!(cell_alpha(0.8, 0.8, 0.1), 1.0);
        assert!((cell_alpha(0.4, 0.8, 0.1) - 0.55).abs() < 1e-9);
        assert_eq!(cell_alpha(0.0, 0.0, 0.1), 0.1);
    }

    #[test]
    fn test_heatmap_absent_is_no_data() {
        assert_eq!(heatmap(None, 0.1), HeatmapView::NoData);
    }

    #[test]
    fn test_uniform_heatmap_is_fully_opaque() {
        let matrix = AttentionMatrix::from_rows(&[vec![0.25; 4], vec![0.25; 4]]).unwrap();
        match heatmap(Some(&matrix), 0.1) {
            HeatmapView::Grid { rows, cols, alphas } => {
                assert_eq!((rows, cols), (2, 4));
                assert!(alphas.iter().all(|&a| a == 1.0));
            }
            HeatmapView::NoData => panic!("uniform attention must render as data"),
        }
    }

    #[test]
    fn test_forecast_series_indexes_in_order() {
        let mut history = RollingHistory::new(3);
        for v in [10.0, 9.0, 8.5, 8.0] {
            history.push(v);
        }
        let series = forecast_series(&history, 300.0);
        assert_eq!(series.points, vec![[0.0, 9.0], [1.0, 8.5], [2.0, 8.0]]);
        assert_eq!(series.y_max, 300.0);
    }

    #[test]
    fn test_degradation_series_uses_cycles() {
        let series = degradation_series(
            &DegradationSeries {
                cycles: vec![1, 2, 5],
                health: vec![100.0, 99.0, 97.0],
            },
            100.0,
        );
        assert_eq!(series.points[2], [5.0, 97.0]);
    }

    #[test]
    fn test_model_rows_skip_absent_values() {
        let metrics = EngineMetrics {
            rul: 50.0,
            rmse: 3.0,
            secondary: vec![crate::models::SecondaryEstimate {
                model: "XGBoost",
                rul: None,
                rmse: Some(14.2),
            }],
            health: None,
            window_size: Some(30.0),
            attention: None,
        };
        assert_eq!(
            model_rows(&metrics),
            vec![
                ("XGBoost RMSE".to_string(), "14.20".to_string()),
                ("Window".to_string(), "30".to_string()),
            ]
        );
    }
}

//! Property tests for the view projection and the rolling store
//!
//! Values come from anywhere the backend might send them, including out of
//! range and negative inputs.

use proptest::prelude::*;

use rul_dashboard::models::AttentionMatrix;
use rul_dashboard::store::{RollingHistory, SimulationCursor};
use rul_dashboard::ui::view::{
    cell_alpha, clamp_health, classify_health, energy_ring, health_gauge, hero_readout, heatmap,
    HealthStatus, HeatmapView,
};

proptest! {
    #[test]
    fn prop_gauge_always_in_range(health in -1_000.0f64..1_000.0) {
        let gauge = health_gauge(health);
        prop_assert!((0.0..=100.0).contains(&gauge.percent));
        prop_assert!((0.0..=180.0).contains(&gauge.degrees));
        prop_assert_eq!(gauge.percent, clamp_health(health));
    }

    #[test]
    fn prop_status_matches_thresholds(health in -50.0f64..150.0) {
        let expected = if clamp_health(health) < 40.0 {
            HealthStatus::Critical
        } else if clamp_health(health) < 70.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Nominal
        };
        prop_assert_eq!(health_gauge(health).status, expected);
        prop_assert_eq!(classify_health(clamp_health(health)), expected);
    }

    #[test]
    fn prop_hero_bounds(rul in 0.0f64..500.0, rmse in 0.0f64..100.0) {
        let hero = hero_readout(rul, rmse);
        prop_assert!(hero.lower >= 0.0);
        prop_assert!(hero.lower <= rul);
        prop_assert!(hero.upper >= rul);
        prop_assert_eq!(hero.upper, rul + rmse);
    }

    #[test]
    fn prop_ring_fraction_clamped_and_monotonic(
        a in -100.0f64..600.0,
        b in -100.0f64..600.0,
        max_rul in 1.0f64..500.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let ring_lo = energy_ring(lo, max_rul);
        let ring_hi = energy_ring(hi, max_rul);
        prop_assert!((0.0..=1.0).contains(&ring_lo.fraction));
        prop_assert!((0.0..=1.0).contains(&ring_hi.fraction));
        prop_assert!(ring_lo.fraction <= ring_hi.fraction);
    }

    #[test]
    fn prop_rolling_history_keeps_newest(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 0..200),
        capacity in 1usize..64,
    ) {
        let mut history = RollingHistory::new(capacity);
        for v in &values {
            history.push(*v);
        }
        prop_assert!(history.len() <= capacity);
        let keep = values.len().min(capacity);
        let expected: Vec<f64> = values[values.len() - keep..].to_vec();
        prop_assert_eq!(history.to_vec(), expected);
    }

    #[test]
    fn prop_cursor_stays_within_history(
        max_cycle in 0u32..400,
        lead_in in 0u32..200,
        rewind in 0u32..200,
        steps in 0usize..600,
    ) {
        let mut cursor = SimulationCursor::new(max_cycle, lead_in, rewind);
        for _ in 0..steps {
            let position = cursor.advance();
            prop_assert!(position <= max_cycle);
        }
    }

    #[test]
    fn prop_cell_alpha_between_floor_and_one(
        value in 0.0f64..10.0,
        max in 0.0f64..10.0,
        floor in 0.0f64..1.0,
    ) {
        let alpha = cell_alpha(value, max, floor);
        prop_assert!(alpha >= floor - 1e-12);
        prop_assert!(alpha <= 1.0 + 1e-12);
    }

    #[test]
    fn prop_cell_alpha_monotonic(
        a in 0.0f64..5.0,
        b in 0.0f64..5.0,
        floor in 0.0f64..1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cell_alpha(lo, 5.0, floor) <= cell_alpha(hi, 5.0, floor) + 1e-12);
    }

    #[test]
    fn prop_heatmap_grid_matches_matrix(
        rows in 1usize..8,
        cols in 1usize..8,
        seed in 0.0f64..1.0,
    ) {
        let data: Vec<Vec<f64>> = (0..rows)
            .map(|r| (0..cols).map(|c| ((r * cols + c) as f64 * seed) % 1.0).collect())
            .collect();
        let matrix = AttentionMatrix::from_rows(&data).expect("rectangular finite matrix");
        match heatmap(Some(&matrix), 0.1) {
            HeatmapView::Grid { rows: r, cols: c, alphas } => {
                prop_assert_eq!((r, c), (rows, cols));
                prop_assert_eq!(alphas.len(), rows * cols);
            }
            HeatmapView::NoData => prop_assert!(false, "expected a grid"),
        }
    }
}

#[test]
fn test_ragged_attention_is_no_data() {
    let ragged = vec![vec![0.1, 0.2], vec![0.3]];
    assert!(AttentionMatrix::from_rows(&ragged).is_none());
    assert_eq!(heatmap(None, 0.1), HeatmapView::NoData);
}

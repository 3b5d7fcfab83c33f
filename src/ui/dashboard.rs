/// Dashboard View
///
/// Lays out the selected engine's readouts: hero numbers, energy ring,
/// health gauge, model performance, both charts and the attention heatmap.

use eframe::egui;
use egui::Color32;

use super::context::{BackendInfo, DashboardContext};
use super::view::{ChartSeries, EngineView};
use super::widgets;

const FORECAST_COLOR: Color32 = Color32::from_rgb(74, 0, 224);
const DEGRADATION_COLOR: Color32 = Color32::from_rgb(0, 86, 179);
const HEALTH_COLOR: Color32 = Color32::from_rgb(52, 199, 89);

/// Render the dashboard body for the current selection
pub fn render_dashboard(ui: &mut egui::Ui, context: &DashboardContext) {
    let Some(view) = context.selected_view() else {
        ui.centered_and_justified(|ui| {
            ui.label(match context.selected() {
                Some(engine) => format!("Waiting for first prediction for {}...", engine.display_label()),
                None => "No engine selected".to_string(),
            });
        });
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        render_hero(ui, &view);
        ui.separator();

        ui.columns(2, |cols| {
            widgets::line_chart(&mut cols[0], &view.forecast, "RUL Forecast (live)", FORECAST_COLOR);
            match &view.degradation {
                Some(series) => widgets::line_chart(
                    &mut cols[1],
                    series,
                    "Degradation History",
                    DEGRADATION_COLOR,
                ),
                None => {
                    cols[1].label("Degradation History");
                    cols[1].weak("History unavailable");
                }
            }
        });
        ui.separator();

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.strong("Transformer Attention");
                widgets::attention_heatmap(ui, &view.heatmap);
            });
            ui.vertical(|ui| {
                render_model_panel(ui, context, &view);
            });
        });
    });
}

fn render_hero(ui: &mut egui::Ui, view: &EngineView) {
    ui.horizontal(|ui| {
        widgets::energy_ring(ui, &view.ring, &view.hero.rul_text);

        ui.vertical(|ui| {
            ui.add_space(30.0);
            ui.label(egui::RichText::new("Remaining Useful Life").small());
            ui.label(egui::RichText::new(view.hero.rul_text.as_str()).size(40.0).strong());
            egui::Grid::new("hero_grid").spacing([20.0, 6.0]).show(ui, |ui| {
                ui.label("RMSE:");
                ui.monospace(view.hero.rmse_text.as_str());
                ui.end_row();
                ui.label("Range:");
                ui.monospace(view.hero.range_text.as_str());
                ui.end_row();
            });
            ui.weak(view.hero.error_text.as_str());
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            widgets::health_gauge(ui, view.gauge.as_ref());
            if let Some(gauge) = &view.gauge {
                ui.vertical_centered(|ui| widgets::status_pill(ui, gauge.status));
            }
        });
    });
}

fn render_model_panel(ui: &mut egui::Ui, context: &DashboardContext, view: &EngineView) {
    ui.strong("Model Performance");
    egui::Grid::new("model_grid")
        .spacing([30.0, 6.0])
        .striped(true)
        .show(ui, |ui| {
            for (name, value) in &view.model_rows {
                ui.label(name.as_str());
                ui.monospace(value.as_str());
                ui.end_row();
            }
            if let Some(cycle) = view.cycle {
                ui.label("Replay cycle");
                ui.monospace(cycle.to_string());
                ui.end_row();
            }
            if let Some(at) = &view.updated_at {
                ui.label("Last update");
                ui.monospace(format!("{} ({} received)", at, view.updates));
                ui.end_row();
            }
        });

    if view.health_trend.len() > 1 {
        ui.add_space(8.0);
        let trend = ChartSeries {
            points: view
                .health_trend
                .iter()
                .enumerate()
                .map(|(i, h)| [i as f64, *h])
                .collect(),
            y_max: 100.0,
        };
        widgets::line_chart(ui, &trend, "Health (recent polls)", HEALTH_COLOR);
    }

    // Engines polled earlier stay cached; show a compact summary
    let cached = context.store.len();
    if cached > 1 {
        ui.weak(format!("{} engines cached this session", cached));
    }
    if view.model_rows.is_empty() {
        ui.weak("No secondary estimator data");
    }
}

/// Footer line describing the backend
pub fn render_backend_footer(ui: &mut egui::Ui, backend: &BackendInfo) {
    match backend {
        BackendInfo::Pending => {
            ui.weak("Backend: checking...");
        }
        BackendInfo::Unavailable => {
            ui.weak("Backend status unavailable");
        }
        BackendInfo::Available { status, metrics } => {
            let mut parts = Vec::new();
            if let Some(s) = status {
                parts.push(format!("{} engines", s.num_engines));
                parts.push(format!("input dim {}", s.input_dim));
                parts.push(format!(
                    "XGBoost {}",
                    if s.xgboost_loaded { "loaded" } else { "missing" }
                ));
                parts.push(format!(
                    "Transformer {}",
                    if s.transformer_loaded { "loaded" } else { "missing" }
                ));
            }
            if let Some(m) = metrics {
                if let Some(rmse) = m.rmse {
                    parts.push(format!("model RMSE {:.2}", rmse));
                }
                if let Some(mae) = m.mae {
                    parts.push(format!("MAE {:.2}", mae));
                }
            }
            ui.weak(format!("Backend: {}", parts.join(" | ")));
        }
    }
}

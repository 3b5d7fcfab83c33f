/// Custom egui Widgets
///
/// Implementations of specialized widgets using egui::Painter:
/// - health_gauge: semicircular health arc with status pill
/// - energy_ring: circular RUL progress indicator
/// - line_chart: fixed-range area chart for the forecast and degradation views
/// - attention_heatmap: weight matrix grid, or an explicit no-data panel
/// - terminal_viewport: monospace diagnostics viewer

use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use super::view::{ChartSeries, EnergyRing, GaugeView, HealthStatus, HeatmapView, RingTone};

const NOMINAL: Color32 = Color32::from_rgb(52, 199, 89);
const CAUTION: Color32 = Color32::from_rgb(255, 149, 0);
const CRITICAL: Color32 = Color32::from_rgb(255, 59, 48);
const RING_GRADIENT: (Color32, Color32) = (
    Color32::from_rgb(0, 199, 190),
    Color32::from_rgb(0, 122, 255),
);
const HEATMAP_BLUE: (u8, u8, u8) = (0, 122, 255);

pub fn status_color(status: HealthStatus) -> Color32 {
    match status {
        HealthStatus::Critical => CRITICAL,
        HealthStatus::Warning => CAUTION,
        HealthStatus::Nominal => NOMINAL,
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// Draw an arc as short line segments; `color_at` receives the position along the arc (0..1)
fn paint_arc(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    start_angle: f32,
    sweep: f32,
    width: f32,
    color_at: impl Fn(f32) -> Color32,
) {
    let segments = ((sweep.abs() / std::f32::consts::PI) * 60.0) as usize + 2;
    for i in 0..segments {
        let t0 = i as f32 / segments as f32;
        let t1 = (i + 1) as f32 / segments as f32;
        let a0 = start_angle + sweep * t0;
        let a1 = start_angle + sweep * t1;
        let p0 = center + Vec2::new(a0.cos() * radius, a0.sin() * radius);
        let p1 = center + Vec2::new(a1.cos() * radius, a1.sin() * radius);
        painter.line_segment([p0, p1], Stroke::new(width, color_at(t0)));
    }
}

/// Small colored status label
pub fn status_pill(ui: &mut egui::Ui, status: HealthStatus) {
    let color = status_color(status);
    egui::Frame::none()
        .fill(color.linear_multiply(0.2))
        .rounding(8.0)
        .inner_margin(egui::Margin::symmetric(10.0, 3.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(status.label()).color(color).strong());
        });
}

/// Semicircular gauge, filling left to right with the health percentage
///
/// `None` draws the empty track with a "--" readout.
pub fn health_gauge(ui: &mut egui::Ui, gauge: Option<&GaugeView>) {
    let (response, painter) = ui.allocate_painter(Vec2::new(200.0, 120.0), egui::Sense::hover());
    let rect = response.rect;
    let center = Pos2::new(rect.center().x, rect.bottom() - 20.0);
    let radius = 80.0;

    // Track: the full half circle, from 180° (left) through the top to 0°
    paint_arc(
        &painter,
        center,
        radius,
        std::f32::consts::PI,
        std::f32::consts::PI,
        12.0,
        |_| Color32::from_gray(60),
    );

    let (text, color) = match gauge {
        Some(g) => {
            let color = status_color(g.status);
            let sweep = (g.degrees as f32).to_radians();
            if sweep > 0.0 {
                paint_arc(&painter, center, radius, std::f32::consts::PI, sweep, 12.0, |_| color);
            }
            (g.label.clone(), color)
        }
        None => ("--".to_string(), Color32::GRAY),
    };

    painter.text(
        center - Vec2::new(0.0, 24.0),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::new(26.0, egui::FontFamily::Proportional),
        color,
    );
    painter.text(
        center + Vec2::new(0.0, 6.0),
        egui::Align2::CENTER_CENTER,
        "Health Index",
        egui::FontId::new(11.0, egui::FontFamily::Proportional),
        Color32::LIGHT_GRAY,
    );
}

/// Circular progress ring for remaining life, starting at 12 o'clock
pub fn energy_ring(ui: &mut egui::Ui, ring: &EnergyRing, center_text: &str) {
    let (response, painter) = ui.allocate_painter(Vec2::new(220.0, 220.0), egui::Sense::hover());
    let center = response.rect.center();
    let radius = 96.0;

    painter.circle_stroke(center, radius, Stroke::new(10.0, Color32::from_gray(50)));

    let sweep = std::f32::consts::TAU * ring.fraction as f32;
    if sweep > 0.0 {
        let start = -std::f32::consts::FRAC_PI_2;
        match ring.tone {
            RingTone::Nominal => paint_arc(&painter, center, radius, start, sweep, 10.0, |t| {
                lerp_color(RING_GRADIENT.0, RING_GRADIENT.1, t)
            }),
            RingTone::Caution => paint_arc(&painter, center, radius, start, sweep, 10.0, |_| CAUTION),
            RingTone::Critical => {
                paint_arc(&painter, center, radius, start, sweep, 10.0, |_| CRITICAL)
            }
        }
    }

    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        center_text,
        egui::FontId::new(36.0, egui::FontFamily::Proportional),
        Color32::WHITE,
    );
    painter.text(
        center + Vec2::new(0.0, 30.0),
        egui::Align2::CENTER_CENTER,
        "cycles remaining",
        egui::FontId::new(11.0, egui::FontFamily::Proportional),
        Color32::LIGHT_GRAY,
    );
}

/// Area chart with a fixed `[0, y_max]` vertical range
pub fn line_chart(ui: &mut egui::Ui, series: &ChartSeries, label: &str, color: Color32) {
    ui.label(label);

    let (response, painter) = ui.allocate_painter(
        Vec2::new(ui.available_width(), 140.0),
        egui::Sense::hover(),
    );
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(46, 52, 64));

    // Subtle grid lines
    let grid_color = Color32::from_gray(70);
    for tick in 0..=4 {
        let y = rect.top() + tick as f32 / 4.0 * rect.height();
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(0.5, grid_color),
        );
    }

    if series.is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Awaiting data...",
            egui::FontId::new(12.0, egui::FontFamily::Proportional),
            Color32::GRAY,
        );
    } else {
        let (x_min, x_max) = series.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])),
        );
        let x_span = (x_max - x_min).max(1.0);
        let y_max = series.y_max.max(f64::EPSILON);

        let to_screen = |p: &[f64; 2]| -> Pos2 {
            let x = rect.left() + ((p[0] - x_min) / x_span) as f32 * rect.width();
            let y = rect.bottom() - (p[1] / y_max).clamp(0.0, 1.0) as f32 * rect.height();
            Pos2::new(x, y)
        };
        let line: Vec<Pos2> = series.points.iter().map(to_screen).collect();

        // Filled area, one quad per step (the outline is rarely convex)
        let fill = color.linear_multiply(0.25);
        for pair in line.windows(2) {
            painter.add(egui::Shape::convex_polygon(
                vec![
                    pair[0],
                    pair[1],
                    Pos2::new(pair[1].x, rect.bottom()),
                    Pos2::new(pair[0].x, rect.bottom()),
                ],
                fill,
                Stroke::NONE,
            ));
        }
        painter.add(egui::Shape::line(line, Stroke::new(2.0, color)));

        painter.text(
            rect.left_top() + Vec2::new(4.0, 2.0),
            egui::Align2::LEFT_TOP,
            format!("{:.0}", series.y_max),
            egui::FontId::new(9.0, egui::FontFamily::Monospace),
            Color32::LIGHT_GRAY,
        );
    }

    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(90)));
}

/// Attention weights as a grid of blue cells, opacity per cell from the view
pub fn attention_heatmap(ui: &mut egui::Ui, view: &HeatmapView) {
    let width = ui.available_width().min(420.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, 150.0), egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 2.0, Color32::from_gray(30));

    match view {
        HeatmapView::NoData => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No attention data",
                egui::FontId::new(13.0, egui::FontFamily::Proportional),
                Color32::GRAY,
            );
        }
        HeatmapView::Grid { rows, cols, alphas } => {
            let cell_w = rect.width() / *cols as f32;
            let cell_h = rect.height() / *rows as f32;
            let (r, g, b) = HEATMAP_BLUE;
            for (i, alpha) in alphas.iter().enumerate() {
                let row = i / cols;
                let col = i % cols;
                let cell = Rect::from_min_size(
                    Pos2::new(
                        rect.left() + col as f32 * cell_w + 0.5,
                        rect.top() + row as f32 * cell_h + 0.5,
                    ),
                    Vec2::new((cell_w - 1.0).max(0.5), (cell_h - 1.0).max(0.5)),
                );
                let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
                painter.rect_filled(cell, 1.0, Color32::from_rgba_unmultiplied(r, g, b, a));
            }
        }
    }

    painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::from_gray(90)));
}

/// Terminal-style log viewer with monospace font
pub fn terminal_viewport<'a>(ui: &mut egui::Ui, lines: impl Iterator<Item = &'a String>) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .max_height(160.0)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            let mut any = false;
            for line in lines {
                any = true;
                ui.monospace(line.as_str());
            }
            if !any {
                ui.monospace("Awaiting output...");
            }
        });
}

/// Main App and eframe integration
///
/// Owns the `DashboardContext` and the receiving end of the event channel.
/// Each frame drains pending events into the context, then renders the
/// selector bar, the dashboard body and the footer.

use eframe::egui;
use tokio::sync::mpsc;

use super::context::{DashboardContext, EngineListState};
use super::controller::{DashboardEvent, PollState};
use super::dashboard;
use super::threading::RepaintSignal;
use super::widgets;

/// Upper bound on events applied per frame so a burst cannot stall rendering
const MAX_EVENTS_PER_FRAME: usize = 256;

pub struct DashboardApp {
    pub context: DashboardContext,
    events_rx: mpsc::Receiver<DashboardEvent>,
    repaint: RepaintSignal,
    show_diagnostics: bool,
}

impl DashboardApp {
    pub fn new(
        context: DashboardContext,
        events_rx: mpsc::Receiver<DashboardEvent>,
        repaint: RepaintSignal,
    ) -> Self {
        DashboardApp {
            context,
            events_rx,
            repaint,
            show_diagnostics: false,
        }
    }

    /// Apply every queued event. Returns true when anything visible changed.
    ///
    /// Ticks are collapsed: however many are queued, one refresh runs after
    /// the other events of the frame.
    pub fn process_events(&mut self) -> bool {
        let mut changed = false;
        let mut tick = false;
        for _ in 0..MAX_EVENTS_PER_FRAME {
            match self.events_rx.try_recv() {
                Ok(DashboardEvent::Tick) => tick = true,
                Ok(event) => changed |= self.context.handle_event(event),
                Err(_) => break,
            }
        }
        if tick {
            changed |= self.context.handle_event(DashboardEvent::Tick);
        }
        changed
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Engine RUL Monitor");
                ui.separator();
                ui.label("Engine:");

                let options = self.context.selector_options();
                let selected_text = match (&self.context.engines, self.context.selected()) {
                    (EngineListState::Loaded(_), Some(id)) => id.display_label(),
                    _ => options
                        .first()
                        .map(|(_, label)| label.clone())
                        .unwrap_or_default(),
                };

                let mut picked = None;
                egui::ComboBox::from_id_source("engine_selector")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for (id, label) in &options {
                            match id {
                                Some(id) => {
                                    let is_selected = self.context.selected() == Some(id);
                                    if ui.selectable_label(is_selected, label.as_str()).clicked() {
                                        picked = Some(id.clone());
                                    }
                                }
                                None => {
                                    ui.add_enabled(false, egui::SelectableLabel::new(false, label.as_str()));
                                }
                            }
                        }
                    });
                if let Some(id) = picked {
                    self.context.select_engine(id);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.context.poll_state() {
                        PollState::Idle => ui.weak("Idle"),
                        PollState::Polling { .. } => ui.weak(format!(
                            "Polling every {} ms",
                            self.context.config.poll_interval_ms
                        )),
                    };
                });
            });
        });
    }

    fn render_footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                dashboard::render_backend_footer(ui, &self.context.backend);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_diagnostics, "Diagnostics");
                    if self.context.failed_fetches > 0 {
                        ui.weak(format!("{} failed requests", self.context.failed_fetches));
                    }
                });
            });
            if self.show_diagnostics {
                ui.separator();
                widgets::terminal_viewport(ui, self.context.logs.iter());
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Background tasks need the context to wake the event loop
        self.repaint.set_context(ctx);

        if self.process_events() {
            ctx.request_repaint();
        }

        self.render_top_bar(ctx);
        self.render_footer(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::render_dashboard(ui, &self.context);
        });

        // Fallback wake-up in case a repaint request raced the first frame
        ctx.request_repaint_after(self.context.config.poll_interval());
    }
}

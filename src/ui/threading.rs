/// Threading and Async Integration Helpers
///
/// Utilities for spawning fetch tasks on the tokio runtime, delivering their
/// results to the UI thread, and waking egui when something arrives.

use crate::ui::controller::DashboardEvent;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Shared handle used by background tasks to request a UI repaint
///
/// The app stores its egui context here on every frame; until the first
/// frame, requests are silently ignored.
#[derive(Clone, Default)]
pub struct RepaintSignal {
    ctx: Arc<RwLock<Option<egui::Context>>>,
}

impl RepaintSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_context(&self, ctx: &egui::Context) {
        if let Ok(mut guard) = self.ctx.write() {
            if guard.is_none() {
                *guard = Some(ctx.clone());
            }
        }
    }

    /// Request UI repaint from a background task
    pub fn request(&self) {
        if let Ok(guard) = self.ctx.read() {
            if let Some(c) = guard.as_ref() {
                c.request_repaint();
            }
        }
    }
}

/// Spawn a task whose outcome is delivered as a `DashboardEvent`
///
/// The future resolves to the event itself (success or failure), so nothing
/// is lost between the network and the UI thread. If the UI has gone away
/// the event is dropped.
pub fn spawn_fetch<Fut>(
    runtime: &Handle,
    label: String,
    tx: mpsc::Sender<DashboardEvent>,
    repaint: RepaintSignal,
    fut: Fut,
) -> tokio::task::JoinHandle<()>
where
    Fut: Future<Output = DashboardEvent> + Send + 'static,
{
    runtime.spawn(async move {
        let event = fut.await;
        if tx.send(event).await.is_err() {
            log::debug!("[Poll] {} finished after the UI closed, result dropped", label);
            return;
        }
        repaint.request();
    })
}

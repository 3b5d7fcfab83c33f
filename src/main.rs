use anyhow::Context as _;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use rul_dashboard::log_collector::get_global_logs_path;
use rul_dashboard::ui::{DashboardApp, DashboardContext, DashboardEvent, RepaintSignal};
use rul_dashboard::{DashboardConfig, HttpPredictionApi, LogCollector, LogLine, SettingsManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // =========================================================================
    // LOGGING INITIALIZATION - MUST BE FIRST
    // =========================================================================
    let log_dir = get_global_logs_path().map_err(anyhow::Error::msg)?;
    let (log_ui_tx, mut log_ui_rx) = mpsc::channel::<LogLine>(1024);
    let log_collector = LogCollector::new(log_dir, log_ui_tx)
        .map_err(anyhow::Error::msg)
        .context("LogCollector initialization failed")?;

    let max_level = if std::env::var_os("RUL_DASHBOARD_DEBUG").is_some() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = log::set_boxed_logger(Box::new(log_collector.clone()))
        .map(|()| log::set_max_level(max_level))
    {
        eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
    }
    log::info!(
        "RUL Dashboard {} starting, logging to {}",
        rul_dashboard::VERSION,
        log_collector.log_path().display()
    );

    // =========================================================================
    // CONFIGURATION
    // =========================================================================
    let arg = std::env::args_os().nth(1);
    if arg.as_deref() == Some(OsStr::new("--write-default-config")) {
        let path = SettingsManager::save(&DashboardConfig::default())
            .context("Failed to write default settings")?;
        println!("Wrote default settings to {}", path.display());
        log_collector.wait_for_empty().await.map_err(anyhow::Error::msg)?;
        return Ok(());
    }

    let config = match arg.map(PathBuf::from) {
        Some(path) => SettingsManager::load_from(&path),
        None => SettingsManager::load().unwrap_or_else(|e| {
            log::warn!("[Main] Settings unavailable ({}), using defaults", e);
            Default::default()
        }),
    };
    log::info!(
        "[Main] Backend {} (poll {} ms, history {})",
        config.api_root(),
        config.poll_interval_ms,
        config.history_length
    );

    // =========================================================================
    // CONTEXT AND CHANNELS SETUP
    // =========================================================================
    let api = Arc::new(HttpPredictionApi::new(&config)?);
    let (events_tx, events_rx) = mpsc::channel::<DashboardEvent>(4096);
    let repaint = RepaintSignal::new();

    // Forward collected log lines into the event stream for the Diagnostics panel
    let log_events_tx = events_tx.clone();
    tokio::spawn(async move {
        while let Some(line) = log_ui_rx.recv().await {
            if log_events_tx.send(DashboardEvent::Log(line)).await.is_err() {
                break;
            }
        }
    });

    let mut context = DashboardContext::new(
        config,
        api,
        events_tx,
        tokio::runtime::Handle::current(),
        repaint.clone(),
    );
    context.start();

    let app = DashboardApp::new(context, events_rx, repaint);

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    let result = eframe::run_native("RUL Dashboard", options, Box::new(move |_cc| Box::new(app)));

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    log::info!("[Main] Window closed, shutting down");
    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Main] WARNING: Failed to flush log collector: {}", e);
    }

    result.map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}

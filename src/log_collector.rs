//! Decoupled logging pipeline for the dashboard.
//!
//! Every `log::*` record is persisted to disk and mirrored to the in-app
//! Diagnostics panel. Disk writes never wait on the UI.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / warn!() / error!()
//!     |
//! [LogCollector] (non-blocking, crossbeam unbounded)
//!     |
//! [writer thread] ---> logs/dashboard_<ts>.log (always)
//!     |
//!     +-------------> UI channel (try_send, dropped when full)
//! ```

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// Get the global logs path relative to the current working directory: ./logs
pub fn get_global_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the global logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// A log line with metadata
#[derive(Clone, Debug, PartialEq)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    /// Wall-clock time the line was created, `HH:MM:SS.mmm`
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, message: String) -> Self {
        LogLine {
            message,
            level,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }
}

/// Unified logger that handles disk and UI dispatch
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    log_path: PathBuf,
}

impl LogCollector {
    /// Create the session log file and start the writer thread
    pub fn new(
        log_dir: PathBuf,
        ui_tx: tokio::sync::mpsc::Sender<LogLine>,
    ) -> Result<Self, String> {
        ensure_logs_dir_exists(&log_dir)?;
        let log_path = log_dir.join(format!(
            "dashboard_{}.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| format!("Failed to open {}: {}", log_path.display(), e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        // OS thread rather than a tokio task so logging keeps working outside
        // the runtime (eframe's event loop, panics during shutdown).
        std::thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let formatted =
                            format!("[{}] [{}] {}\n", line.timestamp, line.level, line.message);
                        let _ = file.write_all(formatted.as_bytes());
                        let _ = ui_tx.try_send(line);
                    }
                    LogMessage::Flush(done) => {
                        let _ = file.flush();
                        let _ = done.send(());
                    }
                }
            }
            let _ = file.flush();
        });

        Ok(LogCollector { tx, log_path })
    }

    /// Path of this session's log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Send a log line (non-blocking)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Wait for all pending logs to be written to disk
    ///
    /// Sends a FLUSH marker down the channel and waits for the writer thread
    /// to reach it, so every line logged before this call is on disk.
    pub async fn wait_for_empty(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        tokio::task::spawn_blocking(move || rx.recv())
            .await
            .map_err(|e| format!("Flush task failed: {}", e))?
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

/// Wires all log::info!(), log::warn!(), log::error!() calls into LogCollector
impl Log for LogCollector {
    /// Dependency chatter (hyper, reqwest, winit) is kept at warn and above
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("rul_dashboard") || metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

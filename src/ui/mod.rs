//! UI Module - egui integration, polling and view projection
//!
//! `controller` issues backend requests and turns their outcomes into
//! `DashboardEvent`s; `context` applies those events to the store on the UI
//! thread; `view` projects store entries into display values; `dashboard`,
//! `widgets` and `app` paint them.

pub mod app;
pub mod context;
pub mod controller;
pub mod dashboard;
pub mod threading;
pub mod view;
pub mod widgets;

pub use app::DashboardApp;
pub use context::{BackendInfo, DashboardContext, EngineListState, CONNECTION_FAILED_LABEL};
pub use controller::{DashboardEvent, FetchKind, PollState, PollingController};
pub use threading::RepaintSignal;
pub use view::EngineView;

//! Fetch Client
//!
//! Stateless, idempotent reads against the prediction backend. Every call
//! either yields a parsed domain value or a `FetchError`; nothing here touches
//! dashboard state. Requests are not deduplicated or cancelled.

pub mod http;

use crate::error::FetchError;
use crate::models::{DegradationSeries, EngineId, EngineMetrics, ModelMetrics, SystemStatus};
use futures::future::BoxFuture;

pub use http::HttpPredictionApi;

/// Read-only access to the prediction backend
///
/// Futures are `'static` so callers can move them onto the runtime.
pub trait PredictionApi: Send + Sync {
    /// `GET /engines`
    fn list_engines(&self) -> BoxFuture<'static, Result<Vec<EngineId>, FetchError>>;

    /// `GET /predict/{id}[?cycle=N]`
    fn get_prediction(
        &self,
        id: &EngineId,
        cycle: Option<u32>,
    ) -> BoxFuture<'static, Result<EngineMetrics, FetchError>>;

    /// `GET /history/{id}`
    fn get_history(&self, id: &EngineId) -> BoxFuture<'static, Result<DegradationSeries, FetchError>>;

    /// `GET /health/{id}`
    fn get_health(&self, id: &EngineId) -> BoxFuture<'static, Result<f64, FetchError>>;

    /// `GET /debug`
    fn get_system_status(&self) -> BoxFuture<'static, Result<SystemStatus, FetchError>>;

    /// `GET /metrics`
    fn get_model_metrics(&self) -> BoxFuture<'static, Result<ModelMetrics, FetchError>>;
}

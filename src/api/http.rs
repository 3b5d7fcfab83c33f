//! reqwest-backed implementation of `PredictionApi`.

use super::PredictionApi;
use crate::config::DashboardConfig;
use crate::error::{AppError, FetchError};
use crate::models::{
    DegradationSeries, EngineId, EngineMetrics, HealthPayload, HistoryPayload, ModelMetrics,
    PredictionPayload, SystemStatus,
};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// HTTP client for the prediction backend
#[derive(Clone)]
pub struct HttpPredictionApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpPredictionApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, AppError> {
        let base = Url::parse(config.api_root())
            .map_err(|e| AppError::Init(format!("Invalid api_base '{}': {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(AppError::Init(format!(
                "api_base '{}' cannot carry a path",
                config.api_base
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Init(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("[API] Backend at {}", base);
        Ok(HttpPredictionApi { client, base })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get<T>(&self, url: Url) -> BoxFuture<'static, Result<T, FetchError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        get_json(self.client.clone(), url).boxed()
    }
}

async fn get_json<T: DeserializeOwned>(client: reqwest::Client, url: Url) -> Result<T, FetchError> {
    log::debug!("[API] GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Api {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await.map_err(|e| FetchError::Connection {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

impl PredictionApi for HttpPredictionApi {
    fn list_engines(&self) -> BoxFuture<'static, Result<Vec<EngineId>, FetchError>> {
        self.get(self.endpoint(&["engines"]))
    }

    fn get_prediction(
        &self,
        id: &EngineId,
        cycle: Option<u32>,
    ) -> BoxFuture<'static, Result<EngineMetrics, FetchError>> {
        let mut url = self.endpoint(&["predict", id.as_str()]);
        if let Some(cycle) = cycle {
            url.query_pairs_mut().append_pair("cycle", &cycle.to_string());
        }
        let request_url = url.to_string();
        let fetch = self.get::<PredictionPayload>(url);
        async move {
            let payload = fetch.await?;
            EngineMetrics::from_payload(payload).map_err(|reason| FetchError::Decode {
                url: request_url,
                reason,
            })
        }
        .boxed()
    }

    fn get_history(&self, id: &EngineId) -> BoxFuture<'static, Result<DegradationSeries, FetchError>> {
        self.get::<HistoryPayload>(self.endpoint(&["history", id.as_str()]))
            .map(|r| r.map(DegradationSeries::from_payload))
            .boxed()
    }

    fn get_health(&self, id: &EngineId) -> BoxFuture<'static, Result<f64, FetchError>> {
        self.get::<HealthPayload>(self.endpoint(&["health", id.as_str()]))
            .map(|r| r.map(|p| p.health))
            .boxed()
    }

    fn get_system_status(&self) -> BoxFuture<'static, Result<SystemStatus, FetchError>> {
        self.get(self.endpoint(&["debug"]))
    }

    fn get_model_metrics(&self) -> BoxFuture<'static, Result<ModelMetrics, FetchError>> {
        self.get(self.endpoint(&["metrics"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpPredictionApi {
        HttpPredictionApi::new(&DashboardConfig {
            api_base: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let api = api("http://127.0.0.1:5000");
        assert_eq!(
            api.endpoint(&["predict", "engine1"]).as_str(),
            "http://127.0.0.1:5000/predict/engine1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = api("http://host/api/");
        assert_eq!(api.endpoint(&["engines"]).as_str(), "http://host/api/engines");
    }

    #[test]
    fn test_endpoint_encodes_engine_id() {
        let api = api("http://host");
        assert_eq!(
            api.endpoint(&["history", "engine 7/b"]).as_str(),
            "http://host/history/engine%207%2Fb"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        let result = HttpPredictionApi::new(&DashboardConfig {
            api_base: "http://".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}

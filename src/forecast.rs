//! HTTP client for the external forecasting service.
//!
//! The service exposes `POST /predict` (multipart `file` + `periods`) and
//! `GET /health`. Nothing is retried or cached; every call is bounded by the
//! client timeout and a timeout counts as the service being unreachable.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days predicted when the caller does not ask for a horizon.
pub const DEFAULT_PERIODS: u32 = 30;

/// Upper bound on a single call to the forecasting service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One row of a series, passed through as the service produced it.
pub type SeriesRow = serde_json::Map<String, serde_json::Value>;

/// CSV payload forwarded to the forecasting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastUpload {
    pub file_name: String,
    pub csv: Vec<u8>,
    /// Number of days to predict.
    pub periods: u32,
}

/// Historical series plus the predicted one, relayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub historical: Vec<SeriesRow>,
    pub forecast: Vec<SeriesRow>,
}

#[derive(Debug, Error)]
pub enum ForecastError {
    /// Connection refused, DNS failure, timeout and the like.
    #[error("forecast service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("prediction failed with status {status}")]
    Rejected { status: u16, body: String },
    /// The service answered 2xx with a body that is not a forecast.
    #[error("failed to parse prediction response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        body: String,
    },
    #[error("health check returned status {0}")]
    Unhealthy(u16),
    #[error("invalid forecast request: {0}")]
    Request(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Build a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ForecastError::Request)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Forward `upload` to `/predict` and decode the forecast.
    pub async fn predict(&self, upload: ForecastUpload) -> Result<ForecastResponse, ForecastError> {
        let ForecastUpload {
            file_name,
            csv,
            periods,
        } = upload;

        let part = Part::bytes(csv)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(ForecastError::Request)?;
        let form = Form::new()
            .part("file", part)
            .text("periods", periods.to_string());

        let response = self
            .http
            .post(self.endpoint("predict"))
            .multipart(form)
            .send()
            .await
            .map_err(ForecastError::Unreachable)?;

        let status = response.status();
        let body = response.text().await.map_err(ForecastError::Unreachable)?;

        if !status.is_success() {
            return Err(ForecastError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<ForecastResponse>(&body) {
            Ok(forecast) => Ok(forecast),
            Err(source) => Err(ForecastError::Parse { source, body }),
        }
    }

    /// Probe `/health`; anything but `200 OK` is a failure.
    pub async fn health(&self) -> Result<(), ForecastError> {
        let response = self
            .http
            .get(self.endpoint("health"))
            .send()
            .await
            .map_err(ForecastError::Unreachable)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            other => Err(ForecastError::Unhealthy(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ForecastClient::new("http://localhost:8000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("predict"), "http://localhost:8000/predict");
    }

    #[test]
    fn forecast_response_keeps_row_fields() {
        let body = r#"{
            "historical": [{"ds": "2024-01-01", "y": 10}],
            "forecast": [{"ds": "2024-01-02", "yhat": 11.5, "yhat_lower": 9.0}]
        }"#;

        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.historical.len(), 1);
        assert_eq!(parsed.forecast[0]["yhat"], serde_json::json!(11.5));
        assert_eq!(parsed.forecast[0].len(), 3);
    }

    #[test]
    fn forecast_rows_keep_upstream_key_order() {
        let body = r#"{"historical":[{"ds":"2024-01-01","y":10}],"forecast":[{"yhat":11.5,"ds":"2024-01-02","yhat_lower":9.0}]}"#;

        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        let keys: Vec<&str> = parsed.forecast[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["yhat", "ds", "yhat_lower"]);

        assert_eq!(serde_json::to_string(&parsed).unwrap(), body);
    }

    #[test]
    fn forecast_response_requires_both_series() {
        assert!(serde_json::from_str::<ForecastResponse>(r#"{"historical": []}"#).is_err());
        assert!(serde_json::from_str::<ForecastResponse>(r#"{"error": "boom"}"#).is_err());
    }
}

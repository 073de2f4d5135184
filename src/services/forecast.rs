use serde::Serialize;

use crate::forecast::{ForecastClient, ForecastError, ForecastResponse};
use crate::forms::forecast::UploadForecastForm;
use crate::services::{ServiceError, ServiceResult};

/// Body of a successful health probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForecastHealth {
    pub status: &'static str,
    pub url: String,
}

impl From<ForecastError> for ServiceError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Unreachable(source) => ServiceError::Upstream {
                message: "Forecast service unreachable".to_string(),
                details: source.to_string(),
                status: None,
                raw_output: None,
            },
            ForecastError::Rejected { status, body } => ServiceError::Upstream {
                message: "Prediction failed".to_string(),
                details: body,
                status: Some(status),
                raw_output: None,
            },
            ForecastError::Parse { source, body } => ServiceError::Upstream {
                message: "Failed to parse prediction response".to_string(),
                details: source.to_string(),
                status: None,
                raw_output: Some(body),
            },
            ForecastError::Unhealthy(status) => {
                ServiceError::Unavailable(format!("health check returned status {status}"))
            }
            ForecastError::Request(source) => ServiceError::Internal(source.to_string()),
        }
    }
}

/// Forwards the uploaded CSV to the forecasting service and relays its answer.
pub async fn upload_forecast(
    client: &ForecastClient,
    form: UploadForecastForm,
) -> ServiceResult<ForecastResponse> {
    let upload = form
        .into_upload()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    log::info!(
        "Forwarding {} ({} bytes, {} periods) to {}",
        upload.file_name,
        upload.csv.len(),
        upload.periods,
        client.base_url()
    );

    let forecast = client.predict(upload).await.map_err(ServiceError::from)?;
    log::info!(
        "Forecast received: {} historical rows, {} predicted rows",
        forecast.historical.len(),
        forecast.forecast.len()
    );

    Ok(forecast)
}

/// Probes the forecasting service. Any failure, including a transport
/// error, is reported as the service being down.
pub async fn check_health(client: &ForecastClient) -> ServiceResult<ForecastHealth> {
    match client.health().await {
        Ok(()) => Ok(ForecastHealth {
            status: "Forecast service healthy",
            url: client.base_url().to_string(),
        }),
        Err(ForecastError::Unreachable(source)) => {
            Err(ServiceError::Unavailable(source.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

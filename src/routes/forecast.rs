use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};

use crate::forecast::ForecastClient;
use crate::forms::forecast::UploadForecastForm;
use crate::routes::error_response;
use crate::services::forecast;

/// Relay a CSV upload to the forecasting service and return its series.
#[post("/forecast/upload")]
pub async fn upload_forecast(
    client: web::Data<ForecastClient>,
    MultipartForm(form): MultipartForm<UploadForecastForm>,
) -> impl Responder {
    match forecast::upload_forecast(client.get_ref(), form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(&err),
    }
}

#[get("/forecast/health")]
pub async fn forecast_health(client: web::Data<ForecastClient>) -> impl Responder {
    match forecast::check_health(client.get_ref()).await {
        Ok(health) => HttpResponse::Ok().json(health),
        Err(err) => error_response(&err),
    }
}

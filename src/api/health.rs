use actix_web::{web, HttpResponse, Responder};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

/// Liveness only: does not touch the store.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = StatusResponse)
    )
)]
pub async fn server_status() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        message: "Server is running smoothly".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (mut response, status, database) = match state.store.ping().await {
        Ok(()) => (HttpResponse::Ok(), "healthy", "connected"),
        Err(e) => {
            log::error!("❌ Health check failed: {}", e);
            (HttpResponse::ServiceUnavailable(), "unhealthy", "unreachable")
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

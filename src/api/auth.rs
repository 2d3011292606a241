use actix_web::{web, HttpResponse};

use crate::models::{AuthMessage, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::auth_service;
use crate::utils::AppError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthMessage),
        (status = 400, description = "User already exists", body = AuthMessage)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let email = request.email.clone();
    log::info!("📝 POST /register - email: {}", email);

    match auth_service::register(state.store.as_ref(), request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", email);
            Ok(HttpResponse::Created().json(response))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = AuthMessage)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let email = request.email.clone();
    log::info!("🔐 POST /login - email: {}", email);

    match auth_service::login(state.store.as_ref(), &state.auth, request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

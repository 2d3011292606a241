//! Handlers shared by every collection. The collection is taken from the
//! [`Resource`] registered as app data on the enclosing scope.

use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::database::Resource;
use crate::services::document_service;
use crate::utils::AppError;
use crate::AppState;

pub async fn list_documents(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
) -> Result<HttpResponse, AppError> {
    let resource = *resource.get_ref();
    log::info!("📋 GET {}", resource.plural_label());

    let documents = document_service::list(state.store.as_ref(), resource).await?;
    Ok(HttpResponse::Ok().json(documents))
}

pub async fn get_document(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let resource = *resource.get_ref();
    let id = path.into_inner();
    log::info!("🔍 GET {} {}", resource.label(), id);

    // null body when nothing matches
    let document = document_service::get(state.store.as_ref(), resource, &id).await?;
    Ok(HttpResponse::Ok().json(document))
}

pub async fn create_document(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let resource = *resource.get_ref();
    log::info!("➕ POST {}", resource.label());

    let ack = document_service::create(state.store.as_ref(), resource, body.into_inner()).await?;
    log::info!("✅ {} created: {}", resource.title(), ack.inserted_id);
    Ok(HttpResponse::Ok().json(ack))
}

pub async fn update_document(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let resource = *resource.get_ref();
    let id = path.into_inner();
    log::info!("🔧 PUT {} {}", resource.label(), id);

    document_service::update(state.store.as_ref(), resource, &id, body.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("{} updated successfully", resource.title())))
}

pub async fn delete_document(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let resource = *resource.get_ref();
    let id = path.into_inner();
    log::info!("🗑️  DELETE {} {}", resource.label(), id);

    document_service::delete(state.store.as_ref(), resource, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

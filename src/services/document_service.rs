use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};

use crate::{
    database::{DocumentStore, Resource},
    models::InsertAck,
    utils::{body_to_document, document_to_json, AppError},
};

pub fn parse_id(resource: Resource, raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(resource.label()))
}

pub async fn list(store: &dyn DocumentStore, resource: Resource) -> Result<Vec<Value>, AppError> {
    let documents = store
        .find_all(resource, &resource.list_options())
        .await
        .map_err(|e| AppError::operation("fetching", resource.plural_label(), e))?;

    Ok(documents.into_iter().map(document_to_json).collect())
}

/// `Ok(None)` when no document carries the id.
pub async fn get(store: &dyn DocumentStore, resource: Resource, raw_id: &str) -> Result<Option<Value>, AppError> {
    let id = parse_id(resource, raw_id)?;

    let document = store
        .find_by_id(resource, &id)
        .await
        .map_err(|e| AppError::operation("fetching", resource.label(), e))?;

    Ok(document.map(document_to_json))
}

pub async fn create(store: &dyn DocumentStore, resource: Resource, body: Map<String, Value>) -> Result<InsertAck, AppError> {
    let document = body_to_document(body).map_err(|e| AppError::operation("adding", resource.label(), e))?;

    let inserted_id = store
        .insert(resource, document)
        .await
        .map_err(|e| AppError::operation("adding", resource.label(), e))?;

    Ok(InsertAck::new(inserted_id))
}

/// Merges the body into the stored document. Succeeds only when exactly one
/// document was modified, so an update that changes nothing is a miss.
pub async fn update(
    store: &dyn DocumentStore,
    resource: Resource,
    raw_id: &str,
    body: Map<String, Value>,
) -> Result<(), AppError> {
    let id = parse_id(resource, raw_id)?;

    let changes = body_to_document(body).map_err(|e| AppError::operation("updating", resource.label(), e))?;
    if changes.is_empty() {
        return Err(AppError::EmptyUpdate);
    }

    let outcome = store
        .update_fields(resource, &id, changes)
        .await
        .map_err(|e| AppError::operation("updating", resource.label(), e))?;

    if outcome.modified == 1 {
        Ok(())
    } else {
        Err(AppError::not_found(resource))
    }
}

pub async fn delete(store: &dyn DocumentStore, resource: Resource, raw_id: &str) -> Result<(), AppError> {
    let id = parse_id(resource, raw_id)?;

    let deleted = store
        .delete(resource, &id)
        .await
        .map_err(|e| AppError::operation("deleting", resource.label(), e))?;

    if deleted == 1 {
        Ok(())
    } else {
        Err(AppError::not_found(resource))
    }
}

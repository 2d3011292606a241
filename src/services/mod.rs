pub mod auth_service;
pub mod document_service;

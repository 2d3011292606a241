pub mod auth;
pub mod documents;
pub mod health;
pub mod swagger;

use actix_web::{web, Scope};

use crate::database::Resource;

/// Same limit as the body parser the web client was written against.
const JSON_LIMIT: usize = 100 * 1024;

fn collection(path: &str, resource: Resource) -> Scope {
    web::scope(path).app_data(web::Data::new(resource))
}

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::server_status))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .app_data(web::JsonConfig::default().limit(JSON_LIMIT))
                // Auth
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    collection("/users", Resource::Users)
                        .route("", web::get().to(documents::list_documents)),
                )
                .service(
                    collection("/donations", Resource::Donations)
                        .route("", web::get().to(documents::list_documents))
                        .route("", web::post().to(documents::create_document))
                        .route("/{id}", web::get().to(documents::get_document))
                        .route("/{id}", web::put().to(documents::update_document))
                        .route("/{id}", web::delete().to(documents::delete_document)),
                )
                .service(
                    collection("/doners", Resource::Donors)
                        .route("", web::get().to(documents::list_documents)),
                )
                .service(
                    collection("/community", Resource::Community)
                        .route("", web::get().to(documents::list_documents))
                        .route("", web::post().to(documents::create_document)),
                )
                .service(
                    collection("/volunteer", Resource::Volunteers)
                        .route("", web::get().to(documents::list_documents))
                        .route("", web::post().to(documents::create_document)),
                )
                .service(
                    collection("/testominal", Resource::Testimonials)
                        .route("", web::get().to(documents::list_documents))
                        .route("", web::post().to(documents::create_document)),
                ),
        );
}

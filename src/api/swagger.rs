use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Disaster Relief API",
        version = "1.0.0",
        description = "Backend for the disaster-relief donation application.\n\n**Collections:** donations, donors, community posts, volunteers, testimonials.\n\n**Authentication:** `/api/v1/login` issues a signed JWT carrying the user's email."
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,

        // Status
        crate::api::health::server_status,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::AuthMessage,
            crate::models::LoginResponse,
            crate::models::InsertAck,
            crate::api::health::StatusResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "User registration and login."),
        (name = "Health", description = "Liveness and database health."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_auth_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/register"));
        assert!(doc.paths.paths.contains_key("/api/v1/login"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}

use crate::{
    config::AuthSettings,
    database::{DocumentStore, Resource, StoreError},
    models::{AuthMessage, LoginRequest, LoginResponse, RegisterRequest, User},
    utils::AppError,
};
use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};

pub const PASSWORD_HASH_COST: u32 = 10;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
}

async fn find_user(store: &dyn DocumentStore, email: &str) -> Result<Option<User>, StoreError> {
    let document = store
        .find_one_by(Resource::Users, "email", Bson::String(email.to_string()))
        .await?;

    match document {
        Some(document) => Ok(Some(bson::from_document(document)?)),
        None => Ok(None),
    }
}

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::internal("Registration failed", e))?
        .map_err(|e| AppError::internal("Registration failed", e))
}

async fn password_matches(password: String, stored_hash: String) -> Result<bool, AppError> {
    let result = tokio::task::spawn_blocking(move || verify(password, &stored_hash))
        .await
        .map_err(|e| AppError::internal("Login failed", e))?;

    match result {
        Ok(valid) => Ok(valid),
        Err(e) => {
            // Hash stored in an unknown format: same answer as a wrong password
            log::warn!("⚠️  Unverifiable password hash: {}", e);
            Ok(false)
        }
    }
}

// Generate JWT token
pub fn issue_token(email: &str, settings: &AuthSettings) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(settings.token_ttl)
        .ok_or_else(|| AppError::internal("Login failed", "token expiry out of range"))?;

    let claims = Claims {
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal("Login failed", e))
}

// Verify JWT token
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

// User registration
pub async fn register(store: &dyn DocumentStore, request: RegisterRequest) -> Result<AuthMessage, AppError> {
    let existing = store
        .find_one_by(Resource::Users, "email", Bson::String(request.email.clone()))
        .await
        .map_err(|e| AppError::internal("Registration failed", e))?;

    if existing.is_some() {
        return Err(AppError::UserExists);
    }

    let user = User {
        id: None,
        name: request.name,
        email: request.email,
        password: Some(hash_password(request.password).await?),
    };

    let document = bson::to_document(&user).map_err(|e| AppError::internal("Registration failed", e))?;

    match store.insert(Resource::Users, document).await {
        Ok(_) => Ok(AuthMessage {
            success: true,
            message: "User registered successfully".to_string(),
        }),
        // A concurrent registration won the unique index
        Err(StoreError::DuplicateKey(_)) => Err(AppError::UserExists),
        Err(e) => Err(AppError::internal("Registration failed", e)),
    }
}

// User login
pub async fn login(
    store: &dyn DocumentStore,
    settings: &AuthSettings,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let user = find_user(store, &request.email)
        .await
        .map_err(|e| AppError::internal("Login failed", e))?
        .ok_or(AppError::InvalidCredentials)?;

    let stored_hash = user.password.ok_or(AppError::InvalidCredentials)?;

    if !password_matches(request.password, stored_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&user.email, settings)?;

    Ok(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use chrono::Duration;
    use mongodb::bson::doc;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::hours(2),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("donor@example.com", &settings()).unwrap();
        let claims = verify_token(&token, &settings()).unwrap();

        assert_eq!(claims.email, "donor@example.com");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = issue_token("donor@example.com", &settings()).unwrap();
        let other = AuthSettings {
            jwt_secret: "other".to_string(),
            ..settings()
        };

        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_token_with_unrepresentable_expiry_fails() {
        let far = AuthSettings {
            token_ttl: Duration::milliseconds(1_000_000 * 31_557_600_000),
            ..settings()
        };

        let err = issue_token("donor@example.com", &far).unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn test_register_ignores_shape_of_existing_user() {
        let store = MemoryStore::new();
        store
            .insert(Resource::Users, doc! { "email": "old@example.com", "name": 42, "password": false })
            .await
            .unwrap();

        let request = RegisterRequest {
            name: Some("Old".to_string()),
            email: "old@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(matches!(register(&store, request).await, Err(AppError::UserExists)));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        let valid = password_matches("secret".to_string(), "not-a-hash".to_string())
            .await
            .unwrap();
        assert!(!valid);
    }
}

/*!
 * # Authentication and Authorization Module
 *
 * Bearer-token authentication for the API. A middleware validates the JWT,
 * re-loads the user row (so role and active-flag changes take effect
 * immediately), and injects an [`AuthUser`] into the request extensions;
 * handlers receive it through an extractor. Role-based row scoping built on
 * top of `AuthUser` lives in `crate::services::access`.
 */

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::user::{self, Entity as UserEntity};
use crate::errors::ServiceError;
use crate::models::Role;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user id)
    pub role: String, // Role at issue time; re-checked against the DB per request
    pub jti: String,  // Unique token id
    pub iat: i64,     // Issued at
    pub exp: i64,     // Expiration
}

/// Resolved caller identity, available to every authenticated handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration: Duration) -> Self {
        Self {
            jwt_secret,
            token_expiration,
        }
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingAuth,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid email or password")]
    WrongCredentials,

    #[error("User account is inactive")]
    UserInactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "Authentication token is missing".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::WrongCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_WRONG_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            Self::UserInactive => (
                StatusCode::UNAUTHORIZED,
                "AUTH_USER_INACTIVE",
                "User account is inactive".to_string(),
            ),
            Self::UserNotFound => (
                StatusCode::UNAUTHORIZED,
                "AUTH_USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::TokenCreation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                msg.clone(),
            ),
            Self::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

/// Authentication service that handles credential checks and token issuance.
#[derive(Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Hashes a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
        use argon2::Argon2;

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::HashError(e.to_string()))
    }

    /// Verifies a password against a stored hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};
        use argon2::Argon2;

        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Checks email + password against the user table.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<user::Model, AuthError> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let Some(found) = found else {
            return Err(AuthError::WrongCredentials);
        };
        if !self.verify_password(password, &found.hashed_password) {
            return Err(AuthError::WrongCredentials);
        }
        if !found.is_active {
            return Err(AuthError::UserInactive);
        }
        Ok(found)
    }

    /// Issues a bearer token for a user.
    pub fn generate_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + chrono::Duration::from_std(self.config.token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validates a bearer token and extracts its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Re-loads the user row for a validated token so role changes and
    /// deactivation take effect without waiting for token expiry.
    pub async fn resolve_user(&self, claims: &Claims) -> Result<AuthUser, AuthError> {
        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let found = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !found.is_active {
            return Err(AuthError::UserInactive);
        }

        Ok(AuthUser {
            id: found.id,
            name: found.name,
            email: found.email,
            role: found.role.parse().unwrap_or(Role::User),
        })
    }
}

async fn resolve_caller(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingAuth)?
        .trim();

    let claims = auth_service.validate_token(token)?;
    auth_service.resolve_user(&claims).await
}

/// Authentication middleware that validates tokens and injects the caller
/// identity into request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    let headers = request.headers().clone();
    match resolve_caller(&headers, &auth_service).await {
        Ok(caller) => {
            debug!(user_id = caller.id, role = %caller.role, "Authenticated request");
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    fn test_service() -> AuthService {
        AuthService::new(
            AuthConfig::new(
                "unit_test_secret_that_is_long_enough_for_hs256".into(),
                Duration::from_secs(1800),
            ),
            Arc::new(DatabaseConnection::Disconnected),
        )
    }

    fn test_user() -> user::Model {
        user::Model {
            id: 7,
            name: "Test User".into(),
            email: "test@example.com".into(),
            phone: None,
            company: None,
            department: None,
            job_title: None,
            address: None,
            city: None,
            county: None,
            postcode: None,
            role: "user".into(),
            avatar: None,
            hashed_password: String::new(),
            is_active: true,
            join_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let svc = test_service();
        let hash = svc.hash_password("s3cret-password").unwrap();
        assert!(svc.verify_password("s3cret-password", &hash));
        assert!(!svc.verify_password("wrong-password", &hash));
    }

    #[test]
    fn token_round_trip() {
        let svc = test_service();
        let token = svc.generate_token(&test_user()).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "7".into(),
            role: "user".into(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp() - 600,
            exp: now.timestamp() - 300,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(svc.config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            svc.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = test_service();
        assert!(matches!(
            svc.validate_token("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::domain::User;
use crate::infrastructure::user_store::{UserStore, UserStoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing credentials")]
    MissingCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("password hash error: {0}")]
    PasswordHash(String),
    #[error("token creation error: {0}")]
    TokenCreation(#[from] jsonwebtoken::errors::Error),
    #[error("user store error: {0}")]
    Store(String),
}

impl From<UserStoreError> for AuthError {
    fn from(err: UserStoreError) -> Self {
        AuthError::Store(err.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-dev-secret".to_string(),
            token_expiry_secs: 3600,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(
    password: &str,
    password_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Checks submitted credential pairs against the store and issues bearer
/// tokens. Transport-free: the axum extractor in the web layer delegates
/// here.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Verify an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        if !matches {
            warn!(email, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Full login: credential check plus token issuance.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let user = self.verify_credentials(email, password).await?;
        let token = self.generate_token(&user.email)?;
        Ok((user, token))
    }

    pub fn generate_token(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + ChronoDuration::seconds(self.config.token_expiry_secs);

        let claims = Claims {
            sub: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// Resolve a bearer token back to its account. The subject must still
    /// exist; tokens outlive deletion otherwise.
    pub async fn resolve_bearer(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.validate_token(token)?;
        self.store
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidCredentials
            | AuthError::MissingCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHash(_) | AuthError::TokenCreation(_) | AuthError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "authentication infrastructure failure");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryUserStore;

    fn service_with(store: Arc<InMemoryUserStore>) -> AuthService {
        AuthService::new(store, AuthConfig::default())
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("13465278").unwrap();

        assert_ne!(hash, "13465278");
        assert!(verify_password("13465278", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn token_roundtrip_preserves_subject() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));
        let token = service.generate_token("maria_silva@email.com").unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "maria_silva@email.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));
        let mut token = service.generate_token("maria_silva@email.com").unwrap();
        token.push('x');

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issuer = AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            AuthConfig {
                jwt_secret: "other-secret".to_string(),
                ..AuthConfig::default()
            },
        );
        let verifier = service_with(Arc::new(InMemoryUserStore::new()));

        let token = issuer.generate_token("maria_silva@email.com").unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_email() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));

        let err = service
            .authenticate("nobody@email.com", "13465278")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_issues_token_for_valid_pair() {
        let store = Arc::new(InMemoryUserStore::new());
        let hash = hash_password("13465278").unwrap();
        let user = User::new(
            "Maria Silva".into(),
            "maria_silva@email.com".into(),
            hash,
            None,
        );
        store.insert(&user).await.unwrap();

        let service = service_with(store);
        let (logged_in, token) = service
            .authenticate("maria_silva@email.com", "13465278")
            .await
            .unwrap();

        assert_eq!(logged_in.id, user.id);
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "maria_silva@email.com");
    }
}

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use axum_extra::{
    headers::authorization::{Authorization, Basic, Bearer},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::UserService;
use crate::domain::{NewUser, User, UserError, UserUpdate};
use crate::infrastructure::auth::{AuthError, AuthService};

pub type AppState = (Arc<UserService>, Arc<AuthService>);

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a well-formed address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a well-formed address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub token: String,
}

/// The authenticated caller of a protected endpoint. Accepts either scheme
/// on the Authorization header: a bearer token from the login endpoint, or
/// basic credentials verified against the stored hash.
pub struct AuthSession {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (_, auth_service) = state;

        if let Ok(TypedHeader(Authorization(bearer))) =
            parts.extract::<TypedHeader<Authorization<Bearer>>>().await
        {
            let user = auth_service.resolve_bearer(bearer.token()).await?;
            return Ok(AuthSession { user });
        }

        let TypedHeader(Authorization(basic)) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| AuthError::MissingCredentials)?;

        let user = auth_service
            .verify_credentials(basic.username(), basic.password())
            .await?;
        Ok(AuthSession { user })
    }
}

pub async fn register_user(
    State((user_service, _)): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, UserError> {
    payload
        .validate()
        .map_err(|e| UserError::Validation(e.to_string()))?;
    if payload.id.is_some() {
        return Err(UserError::IdNotAllowed);
    }

    let user = user_service
        .register(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            photo: payload.photo,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn update_user(
    State((user_service, _)): State<AppState>,
    _session: AuthSession,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<UserResponse>, UserError> {
    payload
        .validate()
        .map_err(|e| UserError::Validation(e.to_string()))?;

    let user = user_service
        .update(UserUpdate {
            id: payload.id,
            name: payload.name,
            email: payload.email,
            password: payload.password,
            photo: payload.photo,
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn list_users(
    State((user_service, _)): State<AppState>,
    _session: AuthSession,
) -> Result<Json<Vec<UserResponse>>, UserError> {
    let users = user_service.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State((user_service, _)): State<AppState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, UserError> {
    let user = user_service.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn login(
    State((_, auth_service)): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let (user, token) = auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        photo: user.photo,
        token,
    }))
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = match &self {
            UserError::EmailExists(_) | UserError::IdNotAllowed | UserError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::PasswordHash(_) | UserError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

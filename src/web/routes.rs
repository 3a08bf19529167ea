use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::UserService;
use crate::infrastructure::auth::AuthService;
use crate::web::handlers::{
    get_user, health_check, list_users, login, register_user, update_user,
};

pub fn create_router(user_service: Arc<UserService>, auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/usuarios/cadastrar", post(register_user))
        .route("/usuarios/atualizar", put(update_user))
        .route("/usuarios/all", get(list_users))
        .route("/usuarios/logar", post(login))
        .route("/usuarios/{id}", get(get_user))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state((user_service, auth_service))
}

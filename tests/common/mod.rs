use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use blog_users::application::UserService;
use blog_users::config::AppConfig;
use blog_users::domain::{NewUser, User};
use blog_users::infrastructure::init::init_services;
use blog_users::infrastructure::{InMemoryUserStore, UserStore};
use blog_users::web::routes::create_router;

pub const ROOT_EMAIL: &str = "root@root.com";
pub const ROOT_PASSWORD: &str = "rootroot";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryUserStore>,
    pub user_service: Arc<UserService>,
}

/// Build the router over a fresh in-memory store, running the same startup
/// bootstrap as the binary (which seeds the root account).
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryUserStore::new());
    let config = AppConfig::default();

    let ctx = init_services(store.clone() as Arc<dyn UserStore>, &config)
        .await
        .expect("init services");

    TestApp {
        router: create_router(ctx.user_service.clone(), ctx.auth_service),
        store,
        user_service: ctx.user_service,
    }
}

impl TestApp {
    /// Register through the service layer directly, the way the original
    /// fixtures bypass the HTTP surface.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str) -> User {
        self.user_service
            .register(NewUser {
                name: name.into(),
                email: email.into(),
                password: password.into(),
                photo: None,
            })
            .await
            .expect("seed user")
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    email: &str,
    password: &str,
) -> Request<Body> {
    let credentials = BASE64.encode(format!("{email}:{password}"));
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Basic {credentials}"))
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_request(method: &str, uri: &str, email: &str, password: &str) -> Request<Body> {
    let credentials = BASE64.encode(format!("{email}:{password}"));
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Basic {credentials}"))
        .body(Body::empty())
        .expect("request")
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

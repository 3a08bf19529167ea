use std::env;

/// Process configuration, read once at startup. A missing `DATABASE_URL`
/// selects the in-memory store, which keeps local runs and the test suite
/// free of external services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub jwt_secret: String,
    pub token_expiry_secs: i64,
    pub root_email: String,
    pub root_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").ok(),
            database_pool_size: env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database_pool_size),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_expiry_secs: env::var("TOKEN_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_expiry_secs),
            root_email: env::var("ROOT_EMAIL").unwrap_or(defaults.root_email),
            root_password: env::var("ROOT_PASSWORD").unwrap_or(defaults.root_password),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            database_pool_size: 10,
            jwt_secret: "change-me-dev-secret".to_string(),
            token_expiry_secs: 3600,
            root_email: "root@root.com".to_string(),
            root_password: "rootroot".to_string(),
        }
    }
}

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod web;

// Re-export commonly used types
pub use application::UserService;
pub use config::AppConfig;
pub use domain::{User, UserError};
pub use infrastructure::{
    AuthService, InMemoryUserStore, PostgresUserStore, UserStore, UserStoreError,
};

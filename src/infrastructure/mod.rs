pub mod auth;
pub mod init;
pub mod logging;
pub mod memory;
pub mod postgres;
pub mod user_store;

pub use auth::{AuthConfig, AuthService};
pub use init::{init_services, ServiceContext};
pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;
pub use user_store::{UserStore, UserStoreError};

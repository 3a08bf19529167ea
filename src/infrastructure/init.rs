use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::UserService;
use crate::config::AppConfig;
use crate::domain::{NewUser, UserError};
use crate::infrastructure::auth::{AuthConfig, AuthService};
use crate::infrastructure::user_store::UserStore;

pub struct ServiceContext {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
}

/// Wire the services over a store and run the startup bootstrap. The test
/// harness calls this too, so fixtures and production share one path.
pub async fn init_services(store: Arc<dyn UserStore>, config: &AppConfig) -> Result<ServiceContext> {
    let user_service = Arc::new(UserService::new(store.clone()));
    let auth_service = Arc::new(AuthService::new(
        store,
        AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
            token_expiry_secs: config.token_expiry_secs,
        },
    ));

    ensure_root_account(&user_service, &config.root_email, &config.root_password).await?;

    Ok(ServiceContext {
        user_service,
        auth_service,
    })
}

/// Idempotent bootstrap of the privileged root account: created through the
/// normal registration path if absent, left untouched if present.
pub async fn ensure_root_account(
    user_service: &UserService,
    email: &str,
    password: &str,
) -> Result<()> {
    match user_service
        .register(NewUser {
            name: "root".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            photo: None,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "created root account");
            Ok(())
        }
        Err(UserError::EmailExists(_)) => {
            debug!("root account already present");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryUserStore;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = UserService::new(store.clone() as Arc<dyn UserStore>);

        ensure_root_account(&service, "root@root.com", "rootroot")
            .await
            .unwrap();
        ensure_root_account(&service, "root@root.com", "rootroot")
            .await
            .unwrap();

        let users = service.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "root@root.com");
    }
}

use std::sync::Arc;

use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};

use blog_users::config::AppConfig;
use blog_users::infrastructure::init::init_services;
use blog_users::infrastructure::logging::init_logging;
use blog_users::infrastructure::{InMemoryUserStore, PostgresUserStore, UserStore};
use blog_users::web::routes::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _log_guard =
        init_logging(None).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let config = AppConfig::from_env();
    info!("starting blog-users service");

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_pool_size)
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PostgresUserStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, falling back to the in-memory store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let ctx = init_services(store, &config).await?;
    let app = create_router(ctx.user_service, ctx.auth_service);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

use std::fs;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            enable_console: true,
            enable_file: false,
            log_level: Level::INFO,
        }
    }
}

/// Install the tracing subscriber: console layer plus optional daily-rolling
/// file output. The returned guard must be held for the process lifetime or
/// buffered file logs are lost.
pub fn init_logging(
    config: Option<LoggingConfig>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let config = config.unwrap_or_default();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "blog_users={level},tower_http=info,sqlx=warn",
            level = config.log_level
        ))
    });

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.enable_console {
        let console_layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_ansi(true);
        layers.push(Box::new(console_layer));
    }

    let mut guard = None;
    if config.enable_file {
        fs::create_dir_all(&config.log_dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "blog-users.log");
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_level(true)
            .with_ansi(false);
        layers.push(Box::new(file_layer));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    Ok(guard)
}

pub mod api;
pub mod client;
pub mod config;
pub mod crypto;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::Config;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Server entry point: tracing, configuration, then serve until shutdown.
pub async fn run() -> Result<(), ServerError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::load();
    let result = api::serve(&config).await;
    if let Err(e) = &result {
        tracing::error!("{e}");
    }
    result
}

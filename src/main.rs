//! Roster server — admin user management with audit replay.
//!
//! Entry point that loads configuration, initializes logging, connects
//! to PostgreSQL, runs migrations, and starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use roster_core::config::AppConfig;
use roster_core::error::AppError;
use roster_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Roster v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    roster_database::migration::run_migrations(db.pool()).await?;

    roster_api::run_server(config, db.into_pool()).await?;

    tracing::info!("Roster server shut down gracefully");
    Ok(())
}

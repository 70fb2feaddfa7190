//! Config Migrator Main Entry Point
//!
//! Imports the XML configuration of a FreeSWITCH installation into the
//! PostgreSQL schema of the Default tenant.

use clap::Parser;
use config_migrator::{AppError, Settings};
use dotenv::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
///
/// `LOG_FORMAT=json` switches to structured JSON lines, anything else gives
/// pretty console output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("config_migrator=info,config_migrator_pipeline=info,config_migrator_repository=info")
    });

    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "config-migrator",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load .env before parsing so its values act as flag fallbacks
    dotenv().ok();

    init_tracing();

    let settings = Settings::parse();
    info!(
        conf_dir = %settings.conf_dir.display(),
        tenant = %settings.tenant,
        dry_run = settings.dry_run,
        "Starting FreeSWITCH config migration"
    );

    let report = match config_migrator::run(&settings).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Config migration failed");
            return Err(e);
        }
    };

    match serde_json::to_string(&report) {
        Ok(summary) => info!(report = %summary, "Config migration finished"),
        Err(e) => warn!(error = %e, "Failed to serialize migration report"),
    }

    if settings.strict && report.has_failures() {
        let failed = report.totals.files_failed;
        error!(files_failed = failed, "Source files failed to import in strict mode");
        return Err(AppError::FailedFiles(failed));
    }

    Ok(())
}

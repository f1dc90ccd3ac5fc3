//! KF2 demo analyzer - batch entry point
//!
//! Reads every demo record of `INPUT_DIR`, analyzes it and writes one JSON
//! report per record to `OUTPUT_DIR`.

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kf2_demo_analytics::config::{Config, LogFormat};
use kf2_demo_analytics::runner::run_batch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    info!("Starting KF2 demo analyzer");
    info!(
        input_dir = %config.input_dir.display(),
        output_dir = %config.output_dir.display(),
        concurrency = config.max_concurrent_records,
        "Configuration loaded"
    );

    tokio::select! {
        outcome = run_batch(&config) => {
            let outcome = outcome?;
            info!(
                analyzed = outcome.analyzed,
                failed = outcome.failed,
                "Batch complete"
            );
        }
        _ = shutdown_signal() => {
            info!("Batch interrupted, reports written so far are kept");
        }
    }

    Ok(())
}

/// Install the global subscriber for the batch run; `RUST_LOG` wins over
/// `LOG_LEVEL`
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
    }
}

/// Resolves on Ctrl+C or SIGTERM so an interrupted batch exits cleanly
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping");
        }
    }
}

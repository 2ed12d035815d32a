use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trellis::config;
use trellis::lifecycle;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Bridges an etcd service registry to an HTTP state API", long_about = None)]
struct Cli {
    /// Full path of the TOML configuration file
    #[arg(short, long, default_value = "config/development.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "trellis starting");

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "Cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        bind_address = %config.server.bind_address,
        store_root = %config.store.root_path,
        "Configuration loaded"
    );

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

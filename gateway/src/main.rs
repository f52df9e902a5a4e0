use clap::Parser;
use proxy::targets::TargetPool;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

/// Forwarding gateway for the portfolio backend fleet.
#[derive(Parser)]
#[command(name = "gateway")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match config::Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            process::exit(1);
        }
    };
    if let Err(e) = config.proxy.validate() {
        tracing::error!("invalid configuration: {e}");
        process::exit(1);
    }

    // The pool is read once here and lives for the process; a malformed
    // backend URL is a startup error, an empty pool is not.
    let pool = match TargetPool::from_env() {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("{e}");
            process::exit(1);
        }
    };
    if pool.is_empty() {
        tracing::warn!("no backend targets configured; every proxied request will fail");
    }

    proxy::run(config.proxy, pool).await;
}

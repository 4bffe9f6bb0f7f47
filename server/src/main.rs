use anyhow::{Error, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

mod app;
mod config;
mod error;
mod metrics;
mod server;
mod service;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// path to the config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    // load config from path
    let config = config::Config::load(args.config)?;

    // init tracing
    let _ = FmtSubscriber::builder()
        .with_env_filter(config.log_filter())
        .try_init();

    let app = app::new(config)?;

    let shutdown = CancellationToken::new();
    let server_token = shutdown.child_token();
    let mut server_handle = {
        let server = app.server.clone();
        tokio::spawn(async move { server.serve(server_token).await })
    };

    let result = tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("start graceful shutdown");
            shutdown.cancel();
            server_handle.await
        }
        result = &mut server_handle => {
            warn!("server stopped before shutdown signal");
            result
        }
    };

    result??;
    info!("shutdown complete");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            debug!("received Ctrl+C signal");
        },
        _ = terminate => {
            debug!("received SIGTERM signal");
        },
    }
}

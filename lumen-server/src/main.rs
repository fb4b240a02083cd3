//! HTTP front for the scenic routing engine.
//!
//! Loads segments and samples from the configured files, builds the
//! graph once and serves route queries against it; `/rebuild` re-reads
//! the files and swaps in a fresh graph without interrupting in-flight
//! queries.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

#[derive(Parser)]
#[command(name = "lumen-server", about = "Scenic-weighted routing over a road network")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short, default_value = "lumen.toml")]
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = config::ServerConfig::load(&args.config)?;
    let bind = config.bind.clone();

    let state = Arc::new(routes::AppState::initialize(config)?);
    {
        let graph = state.engine.graph();
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "route graph ready"
        );
    }

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("listening on {bind}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

use anyhow::Context;
use clap::Parser;
use mandi_server::{serve, shutdown_signal, AppState, Cli};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mandi_server=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let state = AppState::from_cli(&cli).context("failed to initialize marketplace state")?;

    let addr = cli.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running on {addr}");

    serve(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

use std::sync::Arc;

use anyhow::{Context, Result};
use market::PolygonClient;
use market::indicators::Engine;
use server::{AppState, config::Config, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(version = %config.version, engine = ?config.engine, "starting");

    let client = PolygonClient::new(config.provider.clone()).context("init polygon client failed")?;
    let state = Arc::new(AppState {
        client,
        engine: Engine::new(config.engine),
        version: config.version.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv()  => {},
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = ?e, "failed to install signal handlers, falling back to ctrl-c");
            }
        }
    }

    let _ = tokio::signal::ctrl_c().await;
}

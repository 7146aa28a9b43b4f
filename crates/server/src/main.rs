// crates/server/src/main.rs
//! Insight-board server binary.
//!
//! Imports the bundled insights dataset into the in-memory record store,
//! then serves the dashboard API. The store is read-only after startup; a
//! failed import is fatal rather than retried.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use insight_board_server::create_app;
use insight_board_store::RecordStore;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Default port for the server.
const DEFAULT_PORT: u16 = 5000;

/// Default location of the bundled dataset, relative to the working dir.
const DEFAULT_DATA_PATH: &str = "data/insights.json";

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("INSIGHT_BOARD_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Get the dataset path from environment or use the bundled default.
fn get_data_path() -> PathBuf {
    std::env::var("INSIGHT_BOARD_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // One-time import; everything after this point is read-only.
    let data_path = get_data_path();
    let store = RecordStore::load(&data_path)
        .with_context(|| format!("importing dataset from {}", data_path.display()))?;

    let app = create_app(store);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(port, "insight-board listening");
    eprintln!("  \u{2192} http://localhost:{}/api/insights\n", port);

    axum::serve(listener, app).await?;

    Ok(())
}

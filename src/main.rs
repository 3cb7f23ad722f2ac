mod config;
mod error;
mod gateway;
mod hub;
mod protocol;
mod routes;
mod session;
mod state;
mod storage;
mod store;
mod utils {
    pub mod net;
    pub mod sanitize;
}

use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;

use crate::{config::Config, state::AppState, utils::net};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let cfg = Config::from_env()?;
    tokio::fs::create_dir_all(&cfg.upload_dir)
        .await
        .with_context(|| format!("create {}", cfg.upload_dir.display()))?;

    let url   = net::server_url(net::local_ip(), cfg.port);
    let state = AppState::new(&cfg, url.as_str());
    let app   = routes::app(state, &cfg);

    info!("{}", "=".repeat(50));
    info!("Server running on: {url}");
    info!("Open it on another device on the same network");
    info!("{}", "=".repeat(50));

    let addr = SocketAddr::new(cfg.bind, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

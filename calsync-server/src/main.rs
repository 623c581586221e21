mod auth;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use axum::Router;
use calsync_core::Config;
use calsync_core::config::DEFAULT_CONFIG_PATH;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::mask_token;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load(Path::new(DEFAULT_CONFIG_PATH));
    if let Some(port) = port_override() {
        config.port = port;
    }

    let state = AppState::new(config);
    report_startup(&state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::events::router())
        .merge(routes::meta::router())
        .with_state(state.clone())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    info!("calsync-server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `PORT` environment variable takes precedence over the config file.
fn port_override() -> Option<u16> {
    std::env::var("PORT").ok()?.parse().ok()
}

fn report_startup(state: &AppState) {
    for (token, set) in state.gate.entries() {
        info!(
            "token {} grants: {}",
            mask_token(token),
            set.as_slice().join(", ")
        );
    }
    info!("events file: {}", state.store.path().display());
    if state.config.backup_enabled {
        info!("backups enabled, dir: {}", state.config.backup_dir.display());
    } else {
        info!("backups disabled");
    }
    info!("{} events on disk", state.store.load_all().len());
}

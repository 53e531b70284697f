use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{build_reflector_router, build_router};
use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let (events, _) = broadcast::channel(settings.channel_capacity);
    let state = Arc::new(AppState {
        events,
        index_path: settings.index_path,
        static_dir: settings.static_dir,
    });

    let events_addr: SocketAddr = settings
        .events_bind
        .parse()
        .with_context(|| format!("invalid events_bind '{}'", settings.events_bind))?;
    let reflector_addr: SocketAddr = settings
        .reflector_bind
        .parse()
        .with_context(|| format!("invalid reflector_bind '{}'", settings.reflector_bind))?;

    let events_listener = TcpListener::bind(events_addr)
        .await
        .with_context(|| format!("failed to bind event stream on {events_addr}"))?;
    let reflector_listener = TcpListener::bind(reflector_addr)
        .await
        .with_context(|| format!("failed to bind reflector on {reflector_addr}"))?;
    info!(%events_addr, "event stream listening");
    info!(%reflector_addr, "reflector listening");

    tokio::try_join!(
        async {
            axum::serve(events_listener, build_router(Arc::clone(&state)))
                .await
                .context("event stream server failed")
        },
        async {
            axum::serve(reflector_listener, build_reflector_router(Arc::clone(&state)))
                .await
                .context("reflector server failed")
        },
    )?;
    Ok(())
}

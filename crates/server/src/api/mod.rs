use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    routing::get,
    Json, Router,
};
use shared::error::{ApiError, ErrorCode};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};
use tracing::{error, info, warn};

use crate::app_state::AppState;

pub(crate) const EVENTS_ROUTE: &str = "/events/";
pub(crate) const MAX_MESSAGE_BYTES: usize = 64 * 1024;

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(EVENTS_ROUTE, get(events))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .with_state(state)
}

pub(crate) fn build_reflector_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(reflect)
        .layer(RequestBodyLimitLayer::new(MAX_MESSAGE_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, Json<ApiError>)> {
    let page = tokio::fs::read_to_string(&state.index_path)
        .await
        .map_err(|e| {
            error!(path = %state.index_path.display(), error = %e, "failed to read index page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, "index page unavailable")),
            )
        })?;
    Ok(Html(page))
}

struct ClientDetached;

impl Drop for ClientDetached {
    fn drop(&mut self) {
        info!("removed client");
    }
}

async fn events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();
    info!(clients = state.events.receiver_count(), "added new client");

    let detached = ClientDetached;
    let stream = BroadcastStream::new(receiver).filter_map(move |message| {
        let _attached = &detached;
        match message {
            Ok(body) => Some(Ok(Event::default().data(body))),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "client lagged behind the broadcast; messages dropped");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn reflect(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    if method != Method::POST {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                "You can only POST here.",
            )),
        ));
    }

    let message = String::from_utf8_lossy(&body).into_owned();
    // `send` only fails when nobody is subscribed.
    let clients = state.events.send(message).unwrap_or(0);
    info!(clients, "broadcast message");
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

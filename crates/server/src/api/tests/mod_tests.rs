use super::*;
use axum::{body, body::Body, http::Request};
use std::{
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::broadcast;
use tower::ServiceExt;

fn temp_root(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("podvis_server_{label}_{suffix}"));
    fs::create_dir_all(root.join("static")).expect("temp root");
    root
}

fn test_state(root: &std::path::Path) -> Arc<AppState> {
    test_state_with_capacity(root, 16)
}

fn test_state_with_capacity(root: &std::path::Path, capacity: usize) -> Arc<AppState> {
    let (events, _) = broadcast::channel(capacity);
    Arc::new(AppState {
        events,
        index_path: root.join("index.html"),
        static_dir: root.join("static"),
    })
}

#[tokio::test]
async fn healthz_reports_ok() {
    let root = temp_root("healthz");
    let app = build_router(test_state(&root));

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn reflector_rejects_non_post() {
    let root = temp_root("reflector_get");
    let app = build_reflector_router(test_state(&root));

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let error: ApiError = serde_json::from_slice(&body).expect("json");
    assert_eq!(error.code, ErrorCode::Validation);
    assert_eq!(error.message, "You can only POST here.");
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn reflector_broadcasts_raw_body_to_subscribers() {
    let root = temp_root("reflector_post");
    let state = test_state(&root);
    let mut first = state.events.subscribe();
    let mut second = state.events.subscribe();
    let app = build_reflector_router(state);
    let payload = r#"{"podName":"web-1","containerStates":{"app":"running"}}"#;

    let response = app
        .oneshot(
            Request::post("/any/path")
                .body(Body::from(payload))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(first.try_recv().expect("first"), payload);
    assert_eq!(second.try_recv().expect("second"), payload);
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn reflector_accepts_post_without_subscribers() {
    let root = temp_root("reflector_empty");
    let app = build_reflector_router(test_state(&root));

    let response = app
        .oneshot(Request::post("/").body(Body::from("{}")).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn reflector_replaces_invalid_utf8_before_broadcasting() {
    let root = temp_root("reflector_lossy");
    let state = test_state(&root);
    let mut receiver = state.events.subscribe();
    let app = build_reflector_router(state);

    let response = app
        .oneshot(
            Request::post("/")
                .body(Body::from(b"\xff{}".to_vec()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(receiver.try_recv().expect("message"), "\u{fffd}{}");
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn reflector_rejects_oversized_body() {
    let root = temp_root("reflector_large");
    let state = test_state(&root);
    let mut receiver = state.events.subscribe();
    let app = build_reflector_router(state);

    let response = app
        .oneshot(
            Request::post("/")
                .header("content-length", MAX_MESSAGE_BYTES + 1)
                .body(Body::from(vec![b'x'; MAX_MESSAGE_BYTES + 1]))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(receiver.try_recv().is_err());
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn events_route_streams_broadcast_messages() {
    let root = temp_root("events");
    let state = test_state(&root);
    let app = build_router(Arc::clone(&state));

    let response = app
        .oneshot(Request::get(EVENTS_ROUTE).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/event-stream"
    );

    state
        .events
        .send(r#"{"podName":"web-1","containerStates":{}}"#.to_string())
        .expect("one subscriber");
    let mut body = response.into_body().into_data_stream();
    let frame = body.next().await.expect("frame").expect("bytes");

    let frame = String::from_utf8_lossy(&frame);
    assert!(frame.starts_with("data:"), "unexpected frame: {frame}");
    assert!(frame.contains(r#"{"podName":"web-1","containerStates":{}}"#));
    assert!(frame.ends_with("\n\n"));
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn lagging_stream_client_skips_missed_messages() {
    let root = temp_root("events_lag");
    let state = test_state_with_capacity(&root, 1);
    let app = build_router(Arc::clone(&state));

    let response = app
        .oneshot(Request::get(EVENTS_ROUTE).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    for message in ["first", "second", "third"] {
        state
            .events
            .send(message.to_string())
            .expect("one subscriber");
    }
    let mut body = response.into_body().into_data_stream();
    let frame = body.next().await.expect("frame").expect("bytes");

    let frame = String::from_utf8_lossy(&frame);
    assert!(frame.contains("third"), "unexpected frame: {frame}");
    assert!(!frame.contains("first"));
    assert!(!frame.contains("second"));
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn index_serves_page_shell_and_only_at_root() {
    let root = temp_root("index");
    fs::write(root.join("index.html"), "<div id=\"podinfo\"></div>").expect("index");
    let app = build_router(test_state(&root));

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"<div id=\"podinfo\"></div>");

    let response = app
        .oneshot(Request::get("/elsewhere").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn missing_index_is_an_internal_error() {
    let root = temp_root("index_missing");
    let app = build_router(test_state(&root));

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn static_assets_are_served_from_static_dir() {
    let root = temp_root("static");
    fs::write(root.join("static").join("smiley.png"), b"png-bytes").expect("asset");
    let app = build_router(test_state(&root));

    let response = app
        .clone()
        .oneshot(
            Request::get("/static/smiley.png")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"png-bytes");

    let response = app
        .oneshot(
            Request::get("/static/ghost.png")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    fs::remove_dir_all(root).expect("cleanup");
}

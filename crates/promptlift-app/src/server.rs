//! HTTP surface: health, optimize and guide endpoints over axum.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use promptlift_engine::Optimizer;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

/// Prompts are short; anything larger is rejected with 413.
pub const MAX_BODY_SIZE: usize = 65_536;

/// Added on top of the upstream timeout so a slow model still degrades to the
/// local result instead of the request being cut off.
const TIMEOUT_HEADROOM_SECS: u64 = 30;

pub const PATH_HEADER: &str = "x-promptlift-path";
pub const FALLBACK_HEADER: &str = "x-promptlift-fallback";
pub const FALLBACK_REASON_HEADER: &str = "x-promptlift-fallback-reason";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const PROMPT_REQUIRED: &str = "prompt is required";

#[derive(Clone)]
pub struct AppState {
    optimizer: Arc<Optimizer>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
pub async fn run_server(
    host: &str,
    port: u16,
    optimizer: Optimizer,
    upstream_timeout: Duration,
    shutdown: CancellationToken,
) -> Result<()> {
    if is_public_bind(host) {
        tracing::warn!(
            host,
            "binding to a non-loopback address; the API is reachable from the network"
        );
    }

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("bind server socket on {host}:{port}"))?;

    serve_with_listener(listener, optimizer, upstream_timeout, shutdown).await
}

/// Serve from a pre-bound listener.
pub async fn serve_with_listener(
    listener: tokio::net::TcpListener,
    optimizer: Optimizer,
    upstream_timeout: Duration,
    shutdown: CancellationToken,
) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("get server listener local address")?;
    tracing::info!(
        addr = %local_addr,
        remote = optimizer.has_remote(),
        "local API server listening"
    );

    let app = build_app(optimizer, upstream_timeout);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("serve HTTP API")?;

    tracing::info!("server stopped");
    Ok(())
}

pub fn build_app(optimizer: Optimizer, upstream_timeout: Duration) -> Router {
    let state = AppState {
        optimizer: Arc::new(optimizer),
    };
    let request_timeout = upstream_timeout + Duration::from_secs(TIMEOUT_HEADROOM_SECS);

    Router::new()
        .route("/health", get(handle_health).fallback(handle_not_found))
        .route(
            "/api/optimize",
            post(handle_optimize).fallback(handle_not_found),
        )
        .route("/api/guide", get(handle_guide).fallback(handle_not_found))
        .fallback(handle_not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .expose_headers([
                    HeaderName::from_static(PATH_HEADER),
                    HeaderName::from_static(FALLBACK_HEADER),
                    HeaderName::from_static(FALLBACK_REASON_HEADER),
                    HeaderName::from_static(REQUEST_ID_HEADER),
                ]),
        )
}

/// GET /health
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /api/guide
async fn handle_guide() -> impl IntoResponse {
    Json(promptlift_core::guide::guide())
}

async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Pull a non-blank `prompt` string out of a JSON body. Anything else,
/// including a body that is not JSON, counts as missing.
fn extract_prompt(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let prompt = value.get("prompt")?.as_str()?;
    (!prompt.trim().is_empty()).then(|| prompt.to_string())
}

/// Header values must be visible ASCII; anything else becomes `?`.
fn header_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// POST /api/optimize
async fn handle_optimize(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(prompt) = extract_prompt(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: PROMPT_REQUIRED,
            }),
        )
            .into_response();
    };

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("optimize", %request_id, chars = prompt.chars().count());
    let outcome = state.optimizer.optimize(&prompt).instrument(span).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(PATH_HEADER),
        HeaderValue::from_static(outcome.path.as_str()),
    );
    if let Some(fallback) = &outcome.fallback {
        headers.insert(
            HeaderName::from_static(FALLBACK_HEADER),
            HeaderValue::from_static(fallback.kind.as_str()),
        );
        if let Ok(value) = HeaderValue::from_str(&header_text(&fallback.reason)) {
            headers.insert(HeaderName::from_static(FALLBACK_REASON_HEADER), value);
        }
    }
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    (StatusCode::OK, headers, Json(outcome.result)).into_response()
}

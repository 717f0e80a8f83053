//! Local HTTP endpoint for the dashboard.
//!
//! | route                   | response |
//! |-------------------------|----------|
//! | `GET /`, `/index.html`  | the dashboard page |
//! | `GET /health`           | service status and configured paths |
//! | `GET /recalc`           | recalculate, rewrite the dashboard, return the summary |
//! | `OPTIONS *`             | `204` with CORS headers |
//! | anything else           | `404` JSON |
//!
//! Recalculation is synchronous file I/O and runs on the blocking pool, so
//! concurrent requests each get an independent scan.

use crate::analyzer::UsageAnalyzer;
use crate::config::{Config, PathsConfig};
use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "usage_dashboard";

/// Shared application state for the server.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<UsageAnalyzer>,
}

impl AppState {
    pub fn new(paths: PathsConfig) -> Self {
        Self {
            analyzer: Arc::new(UsageAnalyzer::new(paths)),
        }
    }

    fn paths(&self) -> &PathsConfig {
        self.analyzer.paths()
    }
}

fn json_response(status: StatusCode, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    apply_api_headers(&mut response);
    response
}

fn apply_api_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, max-age=0"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

fn html_response(html: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        html,
    )
        .into_response()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

async fn dashboard(State(state): State<AppState>) -> Response {
    let dashboard = &state.paths().dashboard_html;
    match tokio::fs::read_to_string(dashboard).await {
        Ok(html) => html_response(html),
        Err(e) => {
            tracing::warn!(dashboard = %dashboard.display(), error = %e, "Dashboard unavailable");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "ok": false,
                    "error": "dashboard_unavailable",
                    "message": e.to_string(),
                    "dashboard": dashboard.display().to_string(),
                }),
            )
        }
    }
}

async fn health(State(state): State<AppState>) -> Response {
    let paths = state.paths();
    json_response(
        StatusCode::OK,
        json!({
            "ok": true,
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "dashboard": paths.dashboard_html.display().to_string(),
            "codex_sessions_root": paths.codex_sessions.display().to_string(),
            "claude_projects_root": paths.claude_projects.display().to_string(),
            "timestamp": now_rfc3339(),
        }),
    )
}

async fn recalc(State(state): State<AppState>) -> Response {
    let analyzer = state.analyzer.clone();
    let today = Local::now().date_naive();

    let outcome = tokio::task::spawn_blocking(move || analyzer.recalc_dashboard(today))
        .await
        .context("Recalculation task failed")
        .and_then(|result| result);

    match outcome {
        Ok(payload) => match serde_json::to_value(&payload) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => recalc_failed(&anyhow::Error::new(e)),
        },
        Err(e) => recalc_failed(&e),
    }
}

fn recalc_failed(error: &anyhow::Error) -> Response {
    tracing::error!(error = %format!("{error:#}"), "Recalculation failed");
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "ok": false,
            "error": "recalc_failed",
            "message": format!("{error:#}"),
            "timestamp": now_rfc3339(),
        }),
    )
}

async fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_api_headers(&mut response);
    response
}

async fn fallback(req: Request) -> Response {
    if req.method() == Method::OPTIONS {
        return preflight().await;
    }
    json_response(
        StatusCode::NOT_FOUND,
        json!({
            "ok": false,
            "error": "not_found",
            "path": req.uri().path(),
        }),
    )
}

/// Build the axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard).options(preflight))
        .route("/index.html", get(dashboard).options(preflight))
        .route("/health", get(health).options(preflight))
        .route("/recalc", get(recalc).options(preflight))
        .fallback(fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and run until interrupted.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_address();
    let router = build_router(AppState::new(config.paths.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        address = %addr,
        dashboard = %config.paths.dashboard_html.display(),
        "Usage dashboard listening on http://{}",
        addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

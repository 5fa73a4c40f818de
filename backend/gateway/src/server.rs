//! Main HTTP Gateway Server.
//!
//! Routing, CORS handling and the serve loop. Requests share the executor
//! handle, the application directory and the tool lock; nothing else.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use nurseapp_core::{NurseError, ToolExecutor};

use crate::response::unknown_endpoint;
use crate::{files_api, health_api, tools_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub executor: Arc<dyn ToolExecutor>,
    /// Where tools run and artifacts are read from; reported by `/healthz`.
    pub app_dir: Arc<PathBuf>,
    /// Held for the whole of a tool run. Tools write fixed artifact paths,
    /// so runs are one at a time; health and file reads never take it.
    pub tool_lock: Arc<Mutex<()>>,
}

impl GatewayState {
    pub fn new(executor: Arc<dyn ToolExecutor>, app_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            app_dir: Arc::new(app_dir.into()),
            tool_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the router with every gateway endpoint and the CORS layers.
///
/// Wrong methods on known paths fall through to the same 404 as unknown
/// paths. `OPTIONS` is answered before routing for any path.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_api::healthz).fallback(unknown_endpoint))
        .route("/healthz", get(health_api::healthz).fallback(unknown_endpoint))
        .route(
            "/run/assessment",
            post(tools_api::run_assessment).fallback(unknown_endpoint),
        )
        .route(
            "/run/diagnosis",
            post(tools_api::run_diagnosis).fallback(unknown_endpoint),
        )
        .route(
            "/run/careplan",
            post(tools_api::run_careplan).fallback(unknown_endpoint),
        )
        .route(
            "/run/record",
            post(tools_api::run_record).fallback(unknown_endpoint),
        )
        .route(
            "/run/record_review",
            post(tools_api::run_record_review).fallback(unknown_endpoint),
        )
        .fallback(fallback)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(answer_preflight))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,POST,OPTIONS"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// `GET /files/<name>` is matched here rather than as a wildcard route so
/// that `/files/` with an empty name goes through the guard too.
async fn fallback(State(state): State<GatewayState>, method: Method, uri: Uri) -> Response {
    if method == Method::GET && uri.path().starts_with(files_api::FILES_PREFIX) {
        return files_api::get_file(State(state), uri).await;
    }
    unknown_endpoint().await
}

/// 204 for every `OPTIONS`, known path or not.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

/// Bind `addr` and serve until Ctrl-C.
///
/// The exclusive bind is what keeps this a single instance: a second
/// process on the same address fails here and exits.
#[instrument(skip(state))]
pub async fn start_server(addr: &str, state: GatewayState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| NurseError::BindFailed {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: GatewayState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, cwd = %state.app_dir.display(), "Gateway HTTP server listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not install Ctrl-C handler; serving until killed");
        std::future::pending::<()>().await;
    }
}

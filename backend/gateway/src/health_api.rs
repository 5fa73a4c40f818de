//! Gateway Health API
//!
//! `GET /` and `GET /healthz`. This is the endpoint the launch controller
//! waits for, so it never depends on tool state.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

use crate::response::json_response;
use crate::server::GatewayState;

pub async fn healthz(State(state): State<GatewayState>) -> Response {
    json_response(
        StatusCode::OK,
        &json!({ "ok": true, "cwd": state.app_dir.display().to_string() }),
    )
}

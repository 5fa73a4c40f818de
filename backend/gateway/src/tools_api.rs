//! `POST /run/*` handlers.
//!
//! Every handler resolves to one fixed [`Tool`]; the request body only ever
//! contributes stdin text. Bodies that are not a JSON object are treated as
//! `{}` and missing or non-string fields as `""`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Map, Value, json};

use nurseapp_core::Tool;

use crate::response::json_response;
use crate::server::GatewayState;

/// Joins the subjective and objective sections for the assessment tool.
pub const ASSESSMENT_SEPARATOR: &str = "\n<<<SEP>>>\n";

pub async fn run_assessment(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = parse_body(&body);
    let payload = assessment_payload(str_field(&body, "S"), str_field(&body, "O"));
    run_tool(&state, Tool::Assessment, &payload).await
}

pub async fn run_diagnosis(State(state): State<GatewayState>) -> Response {
    run_tool(&state, Tool::Diagnosis, "").await
}

pub async fn run_careplan(State(state): State<GatewayState>) -> Response {
    run_tool(&state, Tool::Careplan, "").await
}

pub async fn run_record(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = parse_body(&body);
    run_tool(&state, Tool::Record, str_field(&body, "text")).await
}

pub async fn run_record_review(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = parse_body(&body);
    run_tool(&state, Tool::RecordReview, str_field(&body, "text")).await
}

async fn run_tool(state: &GatewayState, tool: Tool, stdin_payload: &str) -> Response {
    let invocation = {
        let _running = state.tool_lock.lock().await;
        state.executor.run(tool, stdin_payload).await
    };
    let ok = invocation.succeeded();
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    json_response(
        status,
        &json!({
            "ok": ok,
            "stdout": invocation.stdout,
            "stderr": invocation.stderr,
        }),
    )
}

pub fn assessment_payload(subjective: &str, objective: &str) -> String {
    format!("{subjective}{ASSESSMENT_SEPARATOR}{objective}")
        .trim()
        .to_string()
}

fn parse_body(raw: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn str_field<'a>(body: &'a Map<String, Value>, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or("")
}

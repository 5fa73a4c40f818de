//! Response shaping shared by every handler.
//!
//! Bodies are always sent with an explicit `Content-Type` and
//! `Content-Length`. CORS headers are added by the router's layers.

use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// UTF-8 JSON with non-ASCII characters left as-is.
pub fn json_response(status: StatusCode, body: &Value) -> Response {
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    with_body(status, JSON_CONTENT_TYPE, bytes)
}

pub fn text_response(status: StatusCode, text: impl Into<String>) -> Response {
    with_body(status, TEXT_CONTENT_TYPE, text.into().into_bytes())
}

/// `404 {"ok": false, "error": "unknown endpoint"}`, used for every
/// unmatched path and every unsupported method on a known path.
pub async fn unknown_endpoint() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        &json!({ "ok": false, "error": "unknown endpoint" }),
    )
}

fn with_body(status: StatusCode, content_type: &'static str, bytes: Vec<u8>) -> Response {
    let len = HeaderValue::from(bytes.len());
    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_LENGTH, len),
        ],
        bytes,
    )
        .into_response()
}

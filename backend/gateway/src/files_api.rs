//! `GET /files/<name>` handler.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::Response;

use nurseapp_logging::{EventLogger, GatewayEvent};

use crate::artifacts::{FileAccess, read_artifact};
use crate::response::{json_response, text_response};
use crate::server::GatewayState;

pub const FILES_PREFIX: &str = "/files/";

/// The name is taken from the raw request path and percent-decoded exactly
/// once, so `%252F` stays `%2F` rather than turning into a slash.
pub async fn get_file(State(state): State<GatewayState>, uri: Uri) -> Response {
    let raw = uri.path().strip_prefix(FILES_PREFIX).unwrap_or_default();
    let name = decode_name(raw);

    let access = read_artifact(&state.app_dir, &name).await;
    if access != FileAccess::Forbidden {
        EventLogger::log_event(GatewayEvent::ArtifactRead {
            name: name.clone(),
            outcome: access.outcome(),
        });
    }

    match access {
        FileAccess::Json(value) => json_response(StatusCode::OK, &value),
        FileAccess::Text(text) => text_response(StatusCode::OK, text),
        FileAccess::Forbidden => text_response(StatusCode::FORBIDDEN, "forbidden"),
        FileAccess::NotFound => text_response(StatusCode::NOT_FOUND, format!("{name} not found")),
    }
}

fn decode_name(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_once() {
        assert_eq!(decode_name("record%5Ffinal.txt"), "record_final.txt");
        assert_eq!(decode_name("..%2Fassessment.py"), "../assessment.py");
        assert_eq!(decode_name("a%252Fb"), "a%2Fb");
    }
}

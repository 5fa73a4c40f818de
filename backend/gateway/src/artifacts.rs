//! File Access Guard.
//!
//! Two stages: [`ArtifactName::parse`] decides whether a name is allowed at
//! all, and only then is the file located and decoded. A rejected name never
//! reaches the filesystem, so neither its content nor its existence leaks.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use nurseapp_core::{ArtifactKind, ArtifactName};

#[derive(Debug, Clone, PartialEq)]
pub enum FileAccess {
    Json(Value),
    Text(String),
    Forbidden,
    NotFound,
}

impl FileAccess {
    /// Short label for event logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            FileAccess::Json(_) | FileAccess::Text(_) => "served",
            FileAccess::Forbidden => "forbidden",
            FileAccess::NotFound => "not_found",
        }
    }
}

/// Look up `requested` (already percent-decoded) under `base_dir`.
pub async fn read_artifact(base_dir: &Path, requested: &str) -> FileAccess {
    match ArtifactName::parse(requested) {
        Some(name) => read_allowed(base_dir, name).await,
        None => FileAccess::Forbidden,
    }
}

async fn read_allowed(base_dir: &Path, name: ArtifactName) -> FileAccess {
    let path = base_dir.join(name.as_str());
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return FileAccess::NotFound,
        Err(e) => {
            warn!(artifact = %name, error = %e, "Artifact exists but could not be read");
            return FileAccess::NotFound;
        }
    };

    match name.kind() {
        ArtifactKind::Json => FileAccess::Json(parse_json_lenient(&bytes)),
        ArtifactKind::Text => FileAccess::Text(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Empty or unparsable content becomes `{}`.
fn parse_json_lenient(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Default::default()))
}

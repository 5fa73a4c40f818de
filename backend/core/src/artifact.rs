//! Allowlisted output artifacts.
//!
//! An `ArtifactName` can only be obtained through [`ArtifactName::parse`],
//! which accepts exact members of [`ALLOWED_ARTIFACTS`] and nothing else.
//! Holding one is therefore proof that the allowlist check already ran.

use std::fmt;

/// Output files the tools are known to produce.
pub const ALLOWED_ARTIFACTS: [&str; 9] = [
    "assessment_result.txt",
    "assessment_final.txt",
    "diagnosis_result.txt",
    "diagnosis_final.txt",
    "record_result.txt",
    "record_final.txt",
    "careplan_result.txt",
    "careplan_final.txt",
    "diagnosis_candidates.json",
];

/// How an artifact's bytes should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactName(&'static str);

impl ArtifactName {
    /// Exact-match lookup. No normalization, case folding or path handling.
    pub fn parse(candidate: &str) -> Option<Self> {
        ALLOWED_ARTIFACTS
            .iter()
            .copied()
            .find(|allowed| *allowed == candidate)
            .map(ArtifactName)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn kind(&self) -> ArtifactKind {
        let is_json = std::path::Path::new(self.0)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            ArtifactKind::Json
        } else {
            ArtifactKind::Text
        }
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_near_misses() {
        for candidate in [
            "../assessment_result.txt",
            "./assessment_result.txt",
            "logs/nurseapp.log",
            "/etc/passwd",
            "ASSESSMENT_RESULT.TXT",
            "assessment_result.txt ",
            "assessment.py",
            "",
        ] {
            assert!(ArtifactName::parse(candidate).is_none(), "{candidate:?} accepted");
        }
    }

    #[test]
    fn accepts_every_allowlisted_name() {
        for name in ALLOWED_ARTIFACTS {
            assert_eq!(ArtifactName::parse(name).map(|a| a.as_str()), Some(name));
        }
    }

    #[test]
    fn kind_follows_extension() {
        let json = ArtifactName::parse("diagnosis_candidates.json").unwrap();
        let text = ArtifactName::parse("record_final.txt").unwrap();
        assert_eq!(json.kind(), ArtifactKind::Json);
        assert_eq!(text.kind(), ArtifactKind::Text);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of external clinical-documentation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Assessment,
    Diagnosis,
    Record,
    RecordReview,
    Careplan,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Assessment,
        Tool::Diagnosis,
        Tool::Record,
        Tool::RecordReview,
        Tool::Careplan,
    ];

    /// Stable identifier, as used in `/run/<name>`.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Assessment => "assessment",
            Tool::Diagnosis => "diagnosis",
            Tool::Record => "record",
            Tool::RecordReview => "record_review",
            Tool::Careplan => "careplan",
        }
    }

    /// Script file the tool resolves to, relative to the application directory.
    ///
    /// This mapping is fixed at compile time; nothing from a request can
    /// influence which program gets launched.
    pub fn script(&self) -> &'static str {
        match self {
            Tool::Assessment => "assessment.py",
            Tool::Diagnosis => "diagnosis.py",
            Tool::Record => "record.py",
            Tool::RecordReview => "record_review.py",
            Tool::Careplan => "careplan.py",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One completed run of a tool. Lives for the duration of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: Tool,
    pub stdin_payload: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolInvocation {
    /// Exit code 0 is the only success signal.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Result for a tool that could not be launched or awaited.
    pub fn launch_failure(tool: Tool, stdin_payload: String, diagnostic: impl Into<String>) -> Self {
        Self {
            tool,
            stdin_payload,
            exit_code: 1,
            stdout: String::new(),
            stderr: diagnostic.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_only_accepts_known_tools() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("shell"), None);
    }

    #[test]
    fn launch_failure_is_exit_one_with_empty_stdout() {
        let inv = ToolInvocation::launch_failure(Tool::Diagnosis, String::new(), "no such file");
        assert_eq!(inv.exit_code, 1);
        assert!(inv.stdout.is_empty());
        assert_eq!(inv.stderr, "no such file");
        assert!(!inv.succeeded());
    }
}

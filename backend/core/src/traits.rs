use async_trait::async_trait;

use crate::tool::{Tool, ToolInvocation};

/// Runs an external tool to completion.
///
/// Implementations never fail: launch problems are folded into the returned
/// [`ToolInvocation`] as exit code 1 with a diagnostic on stderr.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn run(&self, tool: Tool, stdin_payload: &str) -> ToolInvocation;
}

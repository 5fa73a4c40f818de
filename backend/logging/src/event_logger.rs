//! Gateway Event Logger
//!
//! Structured events (tool runs, artifact reads, launches) emitted through
//! `tracing` under the `gateway_events` target. Entries only carry names,
//! codes, sizes and timings. Request bodies and tool output are clinical
//! content and never reach the log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use nurseapp_core::{Tool, ToolInvocation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    ToolRun {
        tool: Tool,
        exit_code: i32,
        stdin_bytes: usize,
        stdout_bytes: usize,
        stderr_bytes: usize,
        elapsed_ms: u64,
    },
    ArtifactRead {
        name: String,
        outcome: &'static str,
    },
    Launch {
        addr: String,
        outcome: &'static str,
        attempts: u32,
    },
}

impl GatewayEvent {
    pub fn tool_run(invocation: &ToolInvocation, elapsed_ms: u64) -> Self {
        GatewayEvent::ToolRun {
            tool: invocation.tool,
            exit_code: invocation.exit_code,
            stdin_bytes: invocation.stdin_payload.len(),
            stdout_bytes: invocation.stdout.len(),
            stderr_bytes: invocation.stderr.len(),
            elapsed_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: GatewayEvent,
}

#[derive(Debug)]
pub struct EventLogger;

impl EventLogger {
    pub fn entry(event: GatewayEvent) -> EventLogEntry {
        EventLogEntry {
            timestamp: Utc::now(),
            event,
        }
    }

    /// Serializes the event and hands it to the tracing system.
    pub fn log_event(event: GatewayEvent) {
        let entry = Self::entry(event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "gateway_events", event = %json, "Gateway event"),
            Err(e) => info!(target: "gateway_events", event = ?entry, error = %e, "Gateway event"),
        }
    }
}

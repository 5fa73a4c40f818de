//! Telemetry and structured logging components for nurseapp.
//!
//! Handles console and rolling JSON file output plus content-free gateway
//! event logging.

pub mod event_logger;
pub mod logger;

pub use event_logger::{EventLogEntry, EventLogger, GatewayEvent};
pub use logger::{init_console_logger, init_logger};

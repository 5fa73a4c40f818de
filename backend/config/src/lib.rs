//! `nurseapp-config`: gateway runtime configuration.
//!
//! Provides:
//! - `GatewayConfig` resolved from `NURSE_UI_HOST` / `NURSE_UI_PORT` / `NURSEAPP_DIR`
//! - `ProcessEnvironment`, the fixed environment overlay for child processes
//! - Default values and the tool interpreter invocation

pub mod defaults;
pub mod env;
pub mod schema;

pub use env::ProcessEnvironment;
pub use schema::{default_app_dir, GatewayConfig};

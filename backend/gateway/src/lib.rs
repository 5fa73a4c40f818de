//! nurseapp Gateway HTTP API Server
//!
//! Exposes the tool endpoints (`/run/*`), the allowlisted artifact reader
//! (`/files/*`) and the liveness probe (`/`, `/healthz`).

pub mod artifacts;
pub mod files_api;
pub mod health_api;
pub mod response;
pub mod server;
pub mod tools_api;

pub use artifacts::{FileAccess, read_artifact};
pub use server::{GatewayState, build_router, serve, start_server};

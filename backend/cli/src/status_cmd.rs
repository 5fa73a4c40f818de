//! CLI Status Command
//!
//! Probes the configured address once.

use std::process::ExitCode;

use nurseapp_config::GatewayConfig;
use nurseapp_daemon::{PROBE_TIMEOUT, is_up};

pub async fn run(config: &GatewayConfig) -> ExitCode {
    let addr = config.addr();
    if is_up(&addr, PROBE_TIMEOUT).await {
        println!("nurseapp gateway: running on http://{addr}");
        ExitCode::SUCCESS
    } else {
        println!("nurseapp gateway: not running on {addr}");
        ExitCode::FAILURE
    }
}

//! `nurseapp start`: liveness-check-then-launch.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use nurseapp_config::{GatewayConfig, ProcessEnvironment};
use nurseapp_daemon::{DetachedSpawner, LaunchPolicy, ensure_running};

pub async fn run(config: &GatewayConfig, uri: Option<&str>) -> Result<ExitCode> {
    if let Some(uri) = uri {
        info!(uri, "Activated via URI");
    }

    let spawner = DetachedSpawner::serve_self(
        &config.host,
        config.port,
        &config.app_dir,
        ProcessEnvironment::from_current(),
    )
    .context("cannot locate the nurseapp executable")?;

    let addr = config.addr();
    let status = ensure_running(&addr, &spawner, &LaunchPolicy::default()).await;
    if status.is_ready() {
        println!("nurseapp gateway is running on http://{addr}");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(addr = %addr, status = status.as_str(), "Gateway not ready");
        eprintln!("nurseapp gateway failed to start ({})", status.as_str());
        Ok(ExitCode::FAILURE)
    }
}

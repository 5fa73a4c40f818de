use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::error;

use nurseapp_daemon::install_protocol;

pub async fn run() -> Result<ExitCode> {
    let exe = std::env::current_exe().context("cannot locate the nurseapp executable")?;
    match install_protocol(&exe).await {
        Ok(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "URI scheme registration failed");
            eprintln!("install-protocol failed: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Single-instance launch controller.
///
/// `start` never serves anything itself: it probes the configured address,
/// spawns a detached `serve` instance if nothing answers, then polls until
/// the new instance is reachable or the policy runs out.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::Result;
use nurseapp_config::ProcessEnvironment;
use nurseapp_logging::{EventLogger, GatewayEvent};
use tracing::{error, info, warn};

use crate::liveness::{PROBE_TIMEOUT, is_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    /// The address accepts connections.
    Ready,
    /// Spawned, but nothing answered within the poll budget.
    TimedOut,
    /// The instance could not even be started.
    SpawnFailed,
}

impl LaunchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::TimedOut => "timed_out",
            Self::SpawnFailed => "spawn_failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Clone)]
pub struct LaunchPolicy {
    pub probe_timeout: Duration,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for LaunchPolicy {
    fn default() -> Self {
        Self {
            probe_timeout: PROBE_TIMEOUT,
            poll_interval: Duration::from_millis(400),
            max_attempts: 20,
        }
    }
}

/// Starts a gateway instance without waiting for it.
pub trait InstanceSpawner: Send + Sync {
    fn spawn(&self) -> Result<()>;
}

/// Make sure exactly one gateway is serving on `addr`.
///
/// Calling this while an instance is already up is a no-op. Two launchers
/// racing past the probe may both spawn; the loser fails its bind and exits.
pub async fn ensure_running(
    addr: &str,
    spawner: &dyn InstanceSpawner,
    policy: &LaunchPolicy,
) -> LaunchStatus {
    if is_up(addr, policy.probe_timeout).await {
        info!(addr, "Gateway already running");
        record(addr, LaunchStatus::Ready, 0);
        return LaunchStatus::Ready;
    }

    if let Err(e) = spawner.spawn() {
        error!(addr, error = %e, "Failed to spawn gateway");
        record(addr, LaunchStatus::SpawnFailed, 0);
        return LaunchStatus::SpawnFailed;
    }

    for attempt in 1..=policy.max_attempts {
        if is_up(addr, policy.probe_timeout).await {
            info!(addr, attempt, "Gateway is up");
            record(addr, LaunchStatus::Ready, attempt);
            return LaunchStatus::Ready;
        }
        tokio::time::sleep(policy.poll_interval).await;
    }

    warn!(addr, attempts = policy.max_attempts, "Gateway did not come up in time");
    record(addr, LaunchStatus::TimedOut, policy.max_attempts);
    LaunchStatus::TimedOut
}

fn record(addr: &str, status: LaunchStatus, attempts: u32) {
    EventLogger::log_event(GatewayEvent::Launch {
        addr: addr.to_string(),
        outcome: status.as_str(),
        attempts,
    });
}

/// Spawns a fully detached child: no inherited stdio, its own process
/// group, and the overlaid environment only.
#[derive(Debug, Clone)]
pub struct DetachedSpawner {
    program: PathBuf,
    args: Vec<OsString>,
    work_dir: PathBuf,
    env: ProcessEnvironment,
}

impl DetachedSpawner {
    pub fn new(
        program: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
        work_dir: impl Into<PathBuf>,
        env: ProcessEnvironment,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            work_dir: work_dir.into(),
            env,
        }
    }

    /// Re-launch this executable as `serve --host <host> --port <port>`.
    pub fn serve_self(
        host: &str,
        port: u16,
        app_dir: &Path,
        env: ProcessEnvironment,
    ) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let port = port.to_string();
        Ok(Self::new(
            exe,
            ["serve", "--host", host, "--port", port.as_str()],
            app_dir,
            env,
        ))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.work_dir)
            .env_clear()
            .envs(self.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        cmd
    }
}

impl InstanceSpawner for DetachedSpawner {
    fn spawn(&self) -> Result<()> {
        let child = self.command().spawn()?;
        info!(
            pid = child.id(),
            program = %self.program.display(),
            "Spawned detached gateway"
        );
        // Not waited on; the child outlives this process.
        drop(child);
        Ok(())
    }
}

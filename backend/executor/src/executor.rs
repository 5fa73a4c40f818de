use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use nurseapp_config::defaults::{INTERPRETER, INTERPRETER_ARGS};
use nurseapp_config::ProcessEnvironment;
use nurseapp_core::{Tool, ToolExecutor, ToolInvocation};
use nurseapp_logging::{EventLogger, GatewayEvent};

/// Program and leading arguments used to run a tool script.
///
/// Chosen once at startup. The script path is appended per tool and nothing
/// else is ever added to the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: OsString,
    args: Vec<OsString>,
}

impl Interpreter {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `python3 -X utf8` (`python` on Windows).
    pub fn python() -> Self {
        Self::new(INTERPRETER, INTERPRETER_ARGS)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::python()
    }
}

/// Runs tool scripts from the application directory with the fixed
/// environment overlay, capturing their full output.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    app_dir: PathBuf,
    interpreter: Interpreter,
    env: Arc<ProcessEnvironment>,
}

impl ToolRunner {
    pub fn new(app_dir: impl Into<PathBuf>, interpreter: Interpreter, env: ProcessEnvironment) -> Self {
        Self {
            app_dir: app_dir.into(),
            interpreter,
            env: Arc::new(env),
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    fn command(&self, tool: Tool) -> Command {
        let mut cmd = Command::new(&self.interpreter.program);
        cmd.args(&self.interpreter.args)
            .arg(self.app_dir.join(tool.script()))
            .current_dir(&self.app_dir)
            .env_clear()
            .envs(self.env.iter())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }

    /// Spawn, feed stdin, and wait. Writing and draining happen concurrently
    /// so a tool that produces output before consuming its input cannot
    /// deadlock against us.
    async fn execute(&self, tool: Tool, stdin_payload: &str) -> io::Result<Output> {
        let mut child = self.command(tool).spawn()?;
        let stdin_pipe = child.stdin.take();
        let payload = stdin_payload.as_bytes().to_vec();

        let feed = async move {
            let Some(mut pipe) = stdin_pipe else {
                return Ok(());
            };
            if !payload.is_empty() {
                pipe.write_all(&payload).await?;
            }
            pipe.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        match fed {
            Ok(()) => {}
            // The tool exited or closed stdin without reading everything.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!(tool = %tool, "Tool closed stdin before payload was fully written");
            }
            Err(e) => warn!(tool = %tool, error = %e, "Failed to write tool stdin"),
        }
        output
    }
}

#[async_trait]
impl ToolExecutor for ToolRunner {
    async fn run(&self, tool: Tool, stdin_payload: &str) -> ToolInvocation {
        let started = Instant::now();
        info!(tool = %tool, stdin_bytes = stdin_payload.len(), "Running tool");

        let invocation = match self.execute(tool, stdin_payload).await {
            Ok(output) => ToolInvocation {
                tool,
                stdin_payload: stdin_payload.to_string(),
                // Terminated by a signal.
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => {
                warn!(tool = %tool, error = %e, "Tool failed to launch");
                ToolInvocation::launch_failure(
                    tool,
                    stdin_payload.to_string(),
                    format!("failed to run {}: {e}", tool.script()),
                )
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            tool = %tool,
            exit_code = invocation.exit_code,
            elapsed_ms,
            "Tool finished"
        );
        EventLogger::log_event(GatewayEvent::tool_run(&invocation, elapsed_ms));
        invocation
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Runner whose "interpreter" is `sh`, so tool scripts are shell scripts.
    fn runner_with(scripts: &[(Tool, &str)]) -> (tempfile::TempDir, ToolRunner) {
        let dir = tempfile::tempdir().unwrap();
        for (tool, body) in scripts {
            std::fs::write(dir.path().join(tool.script()), body).unwrap();
        }
        let env = ProcessEnvironment::derive([
            (OsString::from("PATH"), std::env::var_os("PATH").unwrap_or_default()),
            (OsString::from("AI_PROVIDER"), OsString::from("openai")),
        ]);
        let runner = ToolRunner::new(dir.path(), Interpreter::new("sh", Vec::<OsString>::new()), env);
        (dir, runner)
    }

    #[tokio::test]
    async fn stdin_reaches_the_tool_and_stdout_is_captured() {
        let (_dir, runner) = runner_with(&[(Tool::Assessment, "cat\n")]);
        let inv = runner.run(Tool::Assessment, "sub\n<<<SEP>>>\nobj").await;
        assert_eq!(inv.exit_code, 0);
        assert!(inv.succeeded());
        assert_eq!(inv.stdout, "sub\n<<<SEP>>>\nobj");
        assert_eq!(inv.stdin_payload, "sub\n<<<SEP>>>\nobj");
    }

    #[tokio::test]
    async fn nonzero_exit_keeps_code_and_stderr() {
        let (_dir, runner) = runner_with(&[(Tool::Diagnosis, "echo partial\necho 'model unreachable' >&2\nexit 2\n")]);
        let inv = runner.run(Tool::Diagnosis, "").await;
        assert_eq!(inv.exit_code, 2);
        assert_eq!(inv.stdout, "partial\n");
        assert!(inv.stderr.contains("model unreachable"));
    }

    #[tokio::test]
    async fn missing_interpreter_is_reported_as_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ToolRunner::new(
            dir.path(),
            Interpreter::new("/nonexistent/nurseapp-python", Vec::<OsString>::new()),
            ProcessEnvironment::derive(Vec::<(OsString, OsString)>::new()),
        );
        let inv = runner.run(Tool::Careplan, "").await;
        assert_eq!(inv.exit_code, 1);
        assert!(inv.stdout.is_empty());
        assert!(inv.stderr.contains("careplan.py"));
    }

    #[tokio::test]
    async fn child_sees_overlay_environment_and_app_dir() {
        let (dir, runner) = runner_with(&[(
            Tool::Record,
            "printf '%s|%s|%s\\n' \"$AI_PROVIDER\" \"${OPENAI_API_KEY-unset}\" \"$PYTHONUTF8\"\npwd\n",
        )]);
        let inv = runner.run(Tool::Record, "").await;
        let mut lines = inv.stdout.lines();
        assert_eq!(lines.next(), Some("ollama||1"));

        let cwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
        assert_eq!(cwd, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn large_payload_does_not_deadlock() {
        let (_dir, runner) = runner_with(&[(Tool::RecordReview, "cat\n")]);
        let payload = "記録".repeat(100_000);
        let inv = runner.run(Tool::RecordReview, &payload).await;
        assert_eq!(inv.exit_code, 0);
        assert_eq!(inv.stdout.len(), payload.len());
    }

    #[tokio::test]
    async fn tool_ignoring_stdin_still_completes() {
        let (_dir, runner) = runner_with(&[(Tool::Diagnosis, "echo done\n")]);
        let inv = runner.run(Tool::Diagnosis, &"x".repeat(1 << 20)).await;
        assert_eq!(inv.exit_code, 0);
        assert_eq!(inv.stdout, "done\n");
    }

    #[test]
    fn python_interpreter_forces_utf8_mode() {
        let interp = Interpreter::python();
        assert_eq!(interp.args, vec![OsString::from("-X"), OsString::from("utf8")]);
        assert!(!interp.program.is_empty());
    }
}

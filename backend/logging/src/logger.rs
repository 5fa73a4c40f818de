//! Structured Logger
//!
//! Wraps `tracing` with a console layer and a daily rolling NDJSON file.
//! A detached gateway has no usable stdout, so the file is the only record
//! of what it did.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global structured logger.
/// Creates a console logger and a rolling file logger under `log_dir`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Writes NDJSON to `<log_dir>/nurseapp.YYYY-MM-DD.log`
    let file_appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("nurseapp")
        .filename_suffix("log")
        .build(log_dir.as_ref())
    {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!(
                "file logging disabled ({}): {err}",
                log_dir.as_ref().display()
            );
            return init_console_logger(level);
        }
    };

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Console-only logger for short-lived commands (`start`, `status`,
/// `install-protocol`) that should not create log files.
pub fn init_console_logger(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

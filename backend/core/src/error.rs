use thiserror::Error;

/// Top-level error type for the nurseapp gateway.
#[derive(Debug, Error)]
pub enum NurseError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("failed to bind {addr}: {message}")]
    BindFailed { addr: String, message: String },

    #[error("protocol registration failed: {0}")]
    RegistrationFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

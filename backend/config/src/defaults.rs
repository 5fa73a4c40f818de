//! Config defaults for the gateway and the tool process environment.

/// Env var holding the bind host.
pub const HOST_VAR: &str = "NURSE_UI_HOST";

/// Env var holding the bind port.
pub const PORT_VAR: &str = "NURSE_UI_PORT";

/// Env var overriding the application directory.
pub const APP_DIR_VAR: &str = "NURSEAPP_DIR";

pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 8008;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Subdirectory of the application directory that receives log files.
pub const LOG_DIR_NAME: &str = "logs";

/// Keys forced to these values in every tool environment, regardless of
/// what the parent process inherited. Keeps tools on the local model and
/// off any hosted provider.
pub const FORCED_ENV: [(&str, &str); 5] = [
    ("PYTHONIOENCODING", "utf-8"),
    ("PYTHONUTF8", "1"),
    ("AI_PROVIDER", "ollama"),
    ("AI_LOG_DISABLE", "1"),
    ("OPENAI_API_KEY", ""),
];

/// Keys filled in only when the parent did not set them.
pub const DEFAULTED_ENV: [(&str, &str); 2] = [
    ("AI_MODEL", "qwen2.5:7b-instruct"),
    ("OLLAMA_HOST", "http://127.0.0.1:11434"),
];

/// Interpreter used for the tool scripts.
#[cfg(windows)]
pub const INTERPRETER: &str = "python";
#[cfg(not(windows))]
pub const INTERPRETER: &str = "python3";

pub const INTERPRETER_ARGS: [&str; 2] = ["-X", "utf8"];

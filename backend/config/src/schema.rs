//! Typed gateway configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::defaults::{
    APP_DIR_VAR, DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_PORT, HOST_VAR, LOG_DIR_NAME, PORT_VAR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Bind host. Loopback by default; there is no other access control.
    pub host: String,
    pub port: u16,
    /// Directory holding the tool scripts and the artifacts they write.
    pub app_dir: PathBuf,
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            app_dir: default_app_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::from_vars(&vars, default_app_dir())
    }

    /// Build from an explicit variable map (useful for testing).
    pub fn from_vars(vars: &HashMap<String, String>, fallback_app_dir: PathBuf) -> Self {
        let host = vars
            .get(HOST_VAR)
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
            .to_string();

        let port = match vars.get(PORT_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, default = DEFAULT_PORT, "Invalid NURSE_UI_PORT; using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let app_dir = vars
            .get(APP_DIR_VAR)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or(fallback_app_dir);

        let log_level = vars
            .get("RUST_LOG")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            host,
            port,
            app_dir,
            log_level,
        }
    }

    /// `host:port`, suitable for binding or connecting.
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.app_dir.join(LOG_DIR_NAME)
    }

    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

/// Directory of the running executable, falling back to the working directory.
pub fn default_app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Platform-dispatching `nurseapp://` scheme registrar.
///
/// Dispatches to the per-user registry (Windows) or an XDG desktop entry
/// (Linux). Anything else is reported as unsupported.
use std::path::Path;

use anyhow::Result;
use nurseapp_core::NurseError;

pub const SCHEME: &str = "nurseapp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

pub fn current_platform() -> Platform {
    if cfg!(target_os = "macos") {
        Platform::MacOs
    } else if cfg!(target_os = "windows") {
        Platform::Windows
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Other
    }
}

/// Register this executable as the handler for `nurseapp://` URIs so that
/// opening one runs `<exe> start <uri>`.
pub async fn install_protocol(exe: &Path) -> Result<String> {
    install_for(current_platform(), exe).await
}

async fn install_for(platform: Platform, exe: &Path) -> Result<String> {
    match platform {
        Platform::Windows => {
            let key = crate::windows_registry::register_scheme(exe)
                .await
                .map_err(|e| NurseError::RegistrationFailed(e.to_string()))?;
            Ok(format!("Registered {SCHEME}:// under {key}"))
        }
        Platform::Linux => {
            let path = crate::xdg::register_scheme(exe)
                .await
                .map_err(|e| NurseError::RegistrationFailed(e.to_string()))?;
            Ok(format!("Registered {SCHEME}:// via {}", path.display()))
        }
        Platform::MacOs | Platform::Other => {
            Err(NurseError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_platforms_error() {
        for platform in [Platform::MacOs, Platform::Other] {
            let err = install_for(platform, Path::new("/bin/nurseapp"))
                .await
                .unwrap_err();
            let nurse = err.downcast_ref::<NurseError>().unwrap();
            assert!(matches!(nurse, NurseError::UnsupportedPlatform(_)));
        }
    }

    #[test]
    fn platform_matches_target() {
        let platform = current_platform();
        if cfg!(target_os = "linux") {
            assert_eq!(platform, Platform::Linux);
        }
        if cfg!(windows) {
            assert_eq!(platform, Platform::Windows);
        }
    }
}

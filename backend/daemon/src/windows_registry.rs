/// Per-user URL scheme registration under `HKCU\Software\Classes`.
///
/// Written through `reg.exe` so no admin rights or registry crate are needed.
use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use crate::protocol::SCHEME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValue {
    pub key: String,
    /// `None` writes the key's default value.
    pub name: Option<&'static str>,
    pub data: String,
}

pub fn scheme_key() -> String {
    format!(r"HKCU\Software\Classes\{SCHEME}")
}

/// `"<exe>" start "%1"`: the shell substitutes the clicked URI for `%1`.
pub fn open_command(exe: &Path) -> String {
    format!("\"{}\" start \"%1\"", exe.display())
}

pub fn build_values(exe: &Path) -> Vec<RegistryValue> {
    let key = scheme_key();
    vec![
        RegistryValue {
            key: key.clone(),
            name: None,
            data: format!("URL:{SCHEME} Protocol"),
        },
        RegistryValue {
            key: key.clone(),
            name: Some("URL Protocol"),
            data: String::new(),
        },
        RegistryValue {
            key: format!(r"{key}\shell\open\command"),
            name: None,
            data: open_command(exe),
        },
    ]
}

pub fn reg_add_args(value: &RegistryValue) -> Vec<String> {
    let mut args = vec!["add".to_string(), value.key.clone()];
    match value.name {
        Some(name) => {
            args.push("/v".into());
            args.push(name.into());
        }
        None => args.push("/ve".into()),
    }
    args.extend([
        "/t".into(),
        "REG_SZ".into(),
        "/d".into(),
        value.data.clone(),
        "/f".into(),
    ]);
    args
}

async fn reg(args: &[String]) -> Result<(String, i32)> {
    let out = tokio::process::Command::new("reg")
        .args(args)
        .output()
        .await?;
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    let combined = if stderr.trim().is_empty() { stdout } else { stderr };
    Ok((combined, out.status.code().unwrap_or(-1)))
}

pub async fn register_scheme(exe: &Path) -> Result<String> {
    for value in build_values(exe) {
        let (out, code) = reg(&reg_add_args(&value)).await?;
        if code != 0 {
            bail!("reg add {} failed: {}", value.key, out.trim());
        }
    }
    let key = scheme_key();
    info!(key = %key, "Registered URL scheme");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn values_cover_scheme_marker_and_command() {
        let exe = PathBuf::from(r"C:\Program Files\nurseapp\nurseapp.exe");
        let values = build_values(&exe);
        assert_eq!(values.len(), 3);

        assert_eq!(values[0].key, r"HKCU\Software\Classes\nurseapp");
        assert_eq!(values[0].name, None);
        assert_eq!(values[0].data, "URL:nurseapp Protocol");

        assert_eq!(values[1].name, Some("URL Protocol"));
        assert!(values[1].data.is_empty());

        assert_eq!(values[2].key, r"HKCU\Software\Classes\nurseapp\shell\open\command");
        assert_eq!(
            values[2].data,
            r#""C:\Program Files\nurseapp\nurseapp.exe" start "%1""#
        );
    }

    #[test]
    fn default_value_uses_ve() {
        let value = RegistryValue {
            key: scheme_key(),
            name: None,
            data: "x".into(),
        };
        assert_eq!(
            reg_add_args(&value),
            vec!["add", r"HKCU\Software\Classes\nurseapp", "/ve", "/t", "REG_SZ", "/d", "x", "/f"]
        );
    }

    #[test]
    fn named_value_uses_v() {
        let value = RegistryValue {
            key: scheme_key(),
            name: Some("URL Protocol"),
            data: String::new(),
        };
        let args = reg_add_args(&value);
        assert_eq!(&args[2..4], ["/v", "URL Protocol"]);
        assert_eq!(&args[6..], ["/d", "", "/f"]);
    }
}

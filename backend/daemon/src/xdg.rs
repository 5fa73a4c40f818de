/// Linux URL scheme registration via a desktop entry and `xdg-mime`.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::protocol::SCHEME;

pub fn desktop_file_name() -> String {
    format!("{SCHEME}.desktop")
}

pub fn mime_type() -> String {
    format!("x-scheme-handler/{SCHEME}")
}

fn applications_dir() -> Result<PathBuf> {
    let data = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .context("no data directory for the current user")?;
    Ok(data.join("applications"))
}

/// Quote an Exec argument for a desktop entry: wrap in double quotes
/// and backslash-escape `"`, `` ` ``, `$` and `\`.
fn quote_exec_arg(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

pub fn build_desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=nurseapp\n\
         Comment=Local nurseapp gateway launcher\n\
         Exec={exec} start %u\n\
         Terminal=false\n\
         NoDisplay=true\n\
         MimeType={mime};\n",
        exec = quote_exec_arg(&exe.display().to_string()),
        mime = mime_type(),
    )
}

async fn run(program: &str, args: &[&str]) -> Result<(String, i32)> {
    let out = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("failed to run {program}"))?;
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    let combined = if stdout.is_empty() { stderr } else { stdout };
    Ok((combined, out.status.code().unwrap_or(-1)))
}

pub async fn write_desktop_entry(dir: &Path, exe: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(desktop_file_name());
    tokio::fs::write(&path, build_desktop_entry(exe)).await?;
    Ok(path)
}

pub async fn register_scheme(exe: &Path) -> Result<PathBuf> {
    let dir = applications_dir()?;
    let path = write_desktop_entry(&dir, exe).await?;

    let dir_arg = dir.display().to_string();
    if let Err(e) = run("update-desktop-database", &[&dir_arg]).await {
        warn!(error = %e, "update-desktop-database unavailable");
    }

    let name = desktop_file_name();
    let mime = mime_type();
    let (out, code) = run("xdg-mime", &["default", &name, &mime]).await?;
    if code != 0 {
        bail!("xdg-mime default failed: {}", out.trim());
    }
    info!(path = %path.display(), "Registered URL scheme");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_claims_scheme_and_passes_uri() {
        let entry = build_desktop_entry(Path::new("/opt/nurse app/nurseapp"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("\nExec=\"/opt/nurse app/nurseapp\" start %u\n"));
        assert!(entry.contains("\nMimeType=x-scheme-handler/nurseapp;\n"));
    }

    #[test]
    fn exec_quoting_escapes_reserved() {
        assert_eq!(quote_exec_arg("/a/$b"), "\"/a/\\$b\"");
        assert_eq!(quote_exec_arg("q\"t"), "\"q\\\"t\"");
    }

    #[tokio::test]
    async fn writes_entry_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let apps = dir.path().join("applications");
        let path = write_desktop_entry(&apps, Path::new("/usr/bin/nurseapp"))
            .await
            .unwrap();
        assert_eq!(path, apps.join("nurseapp.desktop"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("Exec=\"/usr/bin/nurseapp\" start %u"));
    }
}

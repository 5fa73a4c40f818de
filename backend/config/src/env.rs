//! Environment snapshot handed to every child process.
//!
//! Built once at startup from the inherited environment plus the fixed
//! overlay in [`crate::defaults`]. Children get exactly this map
//! (`env_clear` followed by `envs`), so the gateway never has to mutate its
//! own process environment.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use crate::defaults::{DEFAULTED_ENV, FORCED_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl ProcessEnvironment {
    /// Snapshot the current process environment and apply the overlay.
    pub fn from_current() -> Self {
        Self::derive(std::env::vars_os())
    }

    /// Apply the overlay to an arbitrary inherited set.
    pub fn derive<I, K, V>(inherited: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut vars: BTreeMap<OsString, OsString> = inherited
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for (key, default) in DEFAULTED_ENV {
            let present = vars.keys().any(|k| same_key(k, key));
            if !present {
                vars.insert(key.into(), default.into());
            }
        }

        for (key, value) in FORCED_ENV {
            vars.retain(|k, _| !same_key(k, key));
            vars.insert(key.into(), value.into());
        }

        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars
            .iter()
            .find(|(k, _)| same_key(k, key))
            .map(|(_, v)| v.as_os_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Env keys are case-insensitive on Windows only.
fn same_key(candidate: &OsStr, key: &str) -> bool {
    if cfg!(windows) {
        candidate
            .to_str()
            .is_some_and(|c| c.eq_ignore_ascii_case(key))
    } else {
        candidate == key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ProcessEnvironment {
        ProcessEnvironment::derive(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn forced_keys_override_inherited_values() {
        let e = env(&[
            ("AI_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-live-123"),
            ("PYTHONUTF8", "0"),
        ]);
        assert_eq!(e.get("AI_PROVIDER"), Some(OsStr::new("ollama")));
        assert_eq!(e.get("OPENAI_API_KEY"), Some(OsStr::new("")));
        assert_eq!(e.get("PYTHONUTF8"), Some(OsStr::new("1")));
        assert_eq!(e.get("PYTHONIOENCODING"), Some(OsStr::new("utf-8")));
        assert_eq!(e.get("AI_LOG_DISABLE"), Some(OsStr::new("1")));
    }

    #[test]
    fn defaulted_keys_keep_inherited_values() {
        let e = env(&[("AI_MODEL", "llama3:8b"), ("OLLAMA_HOST", "http://10.0.0.2:11434")]);
        assert_eq!(e.get("AI_MODEL"), Some(OsStr::new("llama3:8b")));
        assert_eq!(e.get("OLLAMA_HOST"), Some(OsStr::new("http://10.0.0.2:11434")));
    }

    #[test]
    fn defaulted_keys_filled_when_missing() {
        let e = env(&[]);
        assert_eq!(e.get("AI_MODEL"), Some(OsStr::new("qwen2.5:7b-instruct")));
        assert_eq!(e.get("OLLAMA_HOST"), Some(OsStr::new("http://127.0.0.1:11434")));
        assert_eq!(e.len(), FORCED_ENV.len() + DEFAULTED_ENV.len());
    }

    #[test]
    fn unrelated_vars_pass_through() {
        let e = env(&[("PATH", "/usr/bin:/bin"), ("HOME", "/home/nurse")]);
        assert_eq!(e.get("PATH"), Some(OsStr::new("/usr/bin:/bin")));
        assert_eq!(e.get("HOME"), Some(OsStr::new("/home/nurse")));
    }
}

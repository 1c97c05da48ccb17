//! # Settings
//!
//! Defaults, then an optional `degree-admin.toml`, then `DEGREE_ADMIN__*`
//! environment variables; later sources win.
//!
//! ```toml
//! api_base_url = "https://modalities.example.edu/api"
//! request_timeout_secs = 20
//! notice_ttl_ms = 3000
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "degree-admin.toml";
const ENV_PREFIX: &str = "DEGREE_ADMIN__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// How long success notices stay on screen.
    pub notice_ttl_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            request_timeout_secs: 15,
            notice_ttl_ms: 3_000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

impl Settings {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Overlay `DEGREE_ADMIN__<FIELD>` variables from `vars`.
    pub fn apply_env<I>(mut self, vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let invalid = || SettingsError::InvalidEnv {
                key: key.clone(),
                value: value.clone(),
            };
            match field.to_ascii_lowercase().as_str() {
                "api_base_url" => self.api_base_url = value.clone(),
                "request_timeout_secs" => {
                    self.request_timeout_secs = value.parse().map_err(|_| invalid())?
                }
                "notice_ttl_ms" => self.notice_ttl_ms = value.parse().map_err(|_| invalid())?,
                _ => debug!(%key, "Ignoring unknown setting"),
            }
        }
        Ok(self)
    }
}

/// Load settings from `path` (or [`DEFAULT_SETTINGS_FILE`] when absent) and
/// the process environment.
///
/// A missing default file is fine; a missing explicit file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    let settings = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => Settings::default(),
        Err(source) => return Err(SettingsError::Read { path, source }),
    };
    settings.apply_env(std::env::vars())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(r#"api_base_url = "https://uni.example/api""#).unwrap();
        assert_eq!(
            settings,
            Settings {
                api_base_url: "https://uni.example/api".into(),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn env_overrides_file() {
        let settings = Settings::default()
            .apply_env(vars(&[
                ("DEGREE_ADMIN__API_BASE_URL", "http://10.0.0.5/api"),
                ("DEGREE_ADMIN__NOTICE_TTL_MS", "1500"),
                ("PATH", "/usr/bin"),
            ]))
            .unwrap();
        assert_eq!(settings.api_base_url, "http://10.0.0.5/api");
        assert_eq!(settings.notice_ttl(), Duration::from_millis(1500));
        assert_eq!(settings.request_timeout_secs, 15);
    }

    #[test]
    fn bad_number_is_reported() {
        let err = Settings::default()
            .apply_env(vars(&[("DEGREE_ADMIN__REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid value for DEGREE_ADMIN__REQUEST_TIMEOUT_SECS: "soon""#
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/degree-admin.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}

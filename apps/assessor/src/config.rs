use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "assessor.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub quota_interval_secs: u64,
    pub notification_ttl_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 30,
            quota_interval_secs: 60,
            notification_ttl_ms: 3000,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn quota_interval(&self) -> Duration {
        Duration::from_secs(self.quota_interval_secs.max(1))
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

/// Defaults, then the config file, then environment overrides.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match explicit_path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

pub fn apply_env_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = lookup("ASSESSOR_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(parsed) = lookup("ASSESSOR_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = parsed;
    }
    if let Some(parsed) = lookup("ASSESSOR_QUOTA_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
        settings.quota_interval_secs = parsed;
    }
    if let Some(parsed) = lookup("ASSESSOR_NOTIFICATION_TTL_MS").and_then(|v| v.parse().ok()) {
        settings.notification_ttl_ms = parsed;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

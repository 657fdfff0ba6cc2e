use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub server_url: String,
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub storage_project: String,
    pub location: String,
    /// Upper bound for one backend call. Zero disables the bound.
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8443".into(),
            storage_endpoint: "http://127.0.0.1:8443/v1".into(),
            storage_bucket: "files".into(),
            storage_project: "local".into(),
            location: "/".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn server_base(&self) -> String {
        self.server_url.trim_end_matches('/').to_string()
    }

    pub fn storage_base(&self) -> Result<Url> {
        let url = Url::parse(self.storage_endpoint.trim())
            .with_context(|| format!("invalid storage endpoint '{}'", self.storage_endpoint))?;
        if url.cannot_be_a_base() {
            return Err(anyhow!(
                "storage endpoint '{}' cannot carry a path",
                self.storage_endpoint
            ));
        }
        Ok(url)
    }
}

/// Settings from `client.toml` in the working directory (if present) with
/// environment overrides applied on top.
pub fn load_settings() -> Result<ClientSettings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<ClientSettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => ClientSettings::default(),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, env);
    Ok(settings)
}

fn apply_env_overrides(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| env(&format!("FILE_ACTIONS_{name}")).or_else(|| env(&format!("APP__{name}")));

    if let Some(v) = lookup("SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("STORAGE_ENDPOINT") {
        settings.storage_endpoint = v;
    }
    if let Some(v) = lookup("STORAGE_BUCKET") {
        settings.storage_bucket = v;
    }
    if let Some(v) = lookup("STORAGE_PROJECT") {
        settings.storage_project = v;
    }
    if let Some(v) = lookup("LOCATION") {
        settings.location = v;
    }
    if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

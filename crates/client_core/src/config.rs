use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::TODOS_TABLE;
use url::Url;

pub const SETTINGS_FILE: &str = "todo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub store_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub request_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_url: None,
            api_key: None,
            table: TODOS_TABLE.into(),
            request_timeout_secs: 10,
        }
    }
}

impl StoreSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    store_url: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `todo.toml` in the working directory, then environment.
pub fn load_settings() -> StoreSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> StoreSettings {
    let mut settings = StoreSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => tracing::warn!(
                path = %path.display(),
                "ignoring unreadable settings file: {err}"
            ),
        }
    }

    apply_env_overrides(&mut settings, env);
    settings
}

fn apply_file_settings(settings: &mut StoreSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.store_url {
        settings.store_url = Some(v);
    }
    if let Some(v) = file_cfg.api_key {
        settings.api_key = Some(v);
    }
    if let Some(v) = file_cfg.table {
        settings.table = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env_overrides(settings: &mut StoreSettings, env: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    // Later names win.
    for name in ["SUPABASE_URL", "TODO_STORE_URL", "APP__STORE_URL"] {
        if let Some(v) = non_empty(name) {
            settings.store_url = Some(v);
        }
    }
    for name in ["SUPABASE_ANON_KEY", "TODO_API_KEY", "APP__API_KEY"] {
        if let Some(v) = non_empty(name) {
            settings.api_key = Some(v);
        }
    }
    if let Some(v) = non_empty("APP__TABLE") {
        settings.table = v;
    }
    if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

/// Parses a store base URL, accepting only http(s) and dropping any
/// trailing slash.
pub fn normalize_store_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("store url is empty");
    }

    let url = Url::parse(trimmed).with_context(|| format!("invalid store url '{trimmed}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("unsupported store url scheme '{other}' in '{trimmed}'"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use wanisync_wanikani::ApiConfig;

use crate::cache::SyncCache;
use crate::error::Error;

/// The name of the application.
pub const APP_NAME: &str = "wanisync";

/// Placeholder substituted in the query templates.
const KANJI_PLACEHOLDER: &str = "{kanji}";

/// Configuration of the sync and unlock workflows.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// `WaniKani` personal access token.
    #[serde(default)]
    pub wk_api_key: String,

    /// Outer search template; `{kanji}` receives the joined per-kanji terms.
    #[serde(default)]
    pub kanji_global_query: String,

    /// Per-kanji search template; `{kanji}` receives the characters.
    #[serde(default)]
    pub kanji_individual_query: String,

    /// Whether the host should use its fast field search.
    #[serde(default)]
    pub should_searching_be_fast: bool,

    /// `WaniKani` connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// `AnkiConnect` connection settings.
    #[serde(default)]
    pub anki: AnkiConfig,

    /// Directory for storing the sync cache.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Cached definitions and feed watermarks, persisted by
    /// [`CacheStore`](crate::CacheStore) rather than with the settings.
    #[serde(skip)]
    pub kanji_list_cache: SyncCache,
}

/// `AnkiConnect` connection settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct AnkiConfig {
    /// `AnkiConnect` endpoint.
    #[serde(default = "default_anki_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_anki_timeout")]
    pub timeout_secs: u64,
}

fn default_anki_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

const fn default_anki_timeout() -> u64 {
    30
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: default_anki_url(),
            timeout_secs: default_anki_timeout(),
        }
    }
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Error> {
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(expand_path(a).map_err(|e| {
                    Error::Config(format!("Failed to expand state directory path: {e}"))
                })?);
            }

            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!(err = %e, "failed to get state directory"),
            },
        }

        Ok(())
    }

    /// `WaniKani` client settings carrying the configured token.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            token: self.wk_api_key.clone(),
            ..self.api.clone()
        }
    }

    /// Builds the host search expression matching every cached kanji.
    ///
    /// Returns `None` while the cache is empty, so that the host is never
    /// handed a template with nothing substituted in.
    #[must_use]
    pub fn kanji_query(&self) -> Option<String> {
        if self.kanji_list_cache.is_empty() {
            return None;
        }

        let terms = self
            .kanji_list_cache
            .kanji()
            .map(|kanji| fill_template(&self.kanji_individual_query, kanji))
            .collect::<Vec<_>>()
            .join(" or ");
        Some(fill_template(&self.kanji_global_query, &terms))
    }

    /// How the host searches, as shown in reports.
    #[must_use]
    pub const fn search_speed(&self) -> &'static str {
        if self.should_searching_be_fast {
            "quickly"
        } else {
            "slowly"
        }
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path
        .to_str()
        .ok_or_else(|| Error::Config("Invalid path".to_string()))?;

    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Error> {
    dirs::home_dir().ok_or_else(|| Error::Config("User-specific home directory not found".into()))
}

fn get_state_dir() -> Result<PathBuf, Error> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| Error::Config("User-specific state directory not found".into()))
}

/// Substitutes `{kanji}` in a query template.
///
/// `{{` and `}}` stand for literal braces. The substituted value is inserted
/// as is and never scanned for placeholders.
fn fill_template(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;
    while let Some(i) = rest.find(['{', '}']) {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];
        if let Some(after) = tail.strip_prefix(KANJI_PLACEHOLDER) {
            out.push_str(value);
            rest = after;
        } else if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

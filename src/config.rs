//! Configuration management for calmtype
//!
//! Stores settings in ~/.config/calmtype/config.json

use crate::api::{LangHint, Tone};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the mediation service base URL.
pub const BASE_URL_ENV: &str = "CALMTYPE_BASE_URL";

fn default_base_url() -> String {
    "https://mediation.calmtype.app".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mediation service base URL. The `CALMTYPE_BASE_URL` environment
    /// variable takes precedence when set.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Preferred tone for rewrites.
    #[serde(default)]
    pub tone: Tone,
    /// Language hint forwarded to the service.
    #[serde(default)]
    pub lang_hint: LangHint,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tone: Tone::default(),
            lang_hint: LangHint::default(),
        }
    }
}

impl Config {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("calmtype"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return defaults. A corrupt file is moved
    /// aside so the user's edits are not silently destroyed.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            return Self::load_from(&path);
        }
        Self::default()
    }

    fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        fs::create_dir_all(&dir)?;
        self.save_to(&dir.join("config.json"))
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Base URL with the environment override applied.
    pub fn effective_base_url(&self) -> String {
        std::env::var(BASE_URL_ENV).unwrap_or_else(|_| self.base_url.clone())
    }

    /// Config file location for display.
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/calmtype/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

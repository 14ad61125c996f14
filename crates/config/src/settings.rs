// Toolkit settings
// Loaded from --config, ./moddict.toml or ~/.config/moddict/moddict.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use moddict_terms::SubstitutionMode;

use crate::error::ConfigError;

pub const FILE_NAME: &str = "moddict.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite store, relative to the working directory.
    pub path: PathBuf,
    pub target_lang: String,
    /// Updates per transaction when restoring.
    pub commit_every: usize,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("moddict.db"),
            target_lang: "ja_jp".to_string(),
            commit_every: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub mode: SubstitutionMode,
    /// Prefix for text the dictionary leaves unchanged.
    pub untranslated_marker: String,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            mode: SubstitutionMode::Sequential,
            untranslated_marker: "[要翻訳] ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { dir: PathBuf::from(".") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub translate: TranslateSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Per-user settings file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("moddict").join(FILE_NAME))
    }

    /// First existing settings file: `explicit`, then `./moddict.toml`, then the user file.
    /// An explicit path is returned even when missing so loading reports it.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        Self::user_config_path().filter(|p| p.is_file())
    }

    /// Load settings, falling back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(explicit) {
            Some(path) => {
                let settings = Self::load_file(&path)?;
                log::debug!("settings from {}", path.display());
                Ok((settings, Some(path)))
            }
            None => {
                log::debug!("no {FILE_NAME} found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents, path)
    }

    /// Parse and validate. `path` is only used for error messages.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.commit_every == 0 {
            return Err("database.commit_every must be greater than 0".to_string());
        }
        if self.database.target_lang.trim().is_empty() {
            return Err("database.target_lang must not be empty".to_string());
        }
        Ok(())
    }
}

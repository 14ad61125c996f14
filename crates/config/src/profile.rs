// Per-mod profile: metadata, dictionaries and key-prefix categories for one mod

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use moddict_terms::SubstitutionMode;

use crate::error::ConfigError;

/// One output document: every key starting with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategorySpec {
    pub prefix: String,
    pub name: String,
    /// Line written as a comment at the top of the document.
    #[serde(default)]
    pub title: Option<String>,
}

/// One part of a mod split over several language file pairs (Mekanism core, tools, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleSpec {
    pub id: String,
    pub name: String,
    pub en: PathBuf,
    pub ja: PathBuf,
    /// Falls back to the profile version.
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookFormat {
    #[default]
    Patchouli,
    /// Mantle books, as shipped by Tinkers' Construct.
    Mantle,
}

impl std::fmt::Display for BookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patchouli => write!(f, "patchouli"),
            Self::Mantle => write!(f, "mantle"),
        }
    }
}

/// Settings for the `book` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookSettings {
    pub category: String,
    /// `YYYY-MM-DD`. Falls back to the profile date, then today.
    pub translation_date: Option<String>,
    pub title: Option<String>,
    pub format: BookFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModProfile {
    pub mod_id: String,
    /// Display name used in document headers. Defaults to `mod_id`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub mc_version: String,
    /// Dictionary files, later ones override earlier phrases.
    #[serde(default)]
    pub dictionaries: Vec<PathBuf>,
    /// Overrides `translate.mode` from the settings.
    #[serde(default)]
    pub mode: Option<SubstitutionMode>,
    /// Cap on entries written per category.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    #[serde(default)]
    pub book: Option<BookSettings>,
    /// `YYYY-MM-DD` stamped on final documents. Today when unset.
    #[serde(default)]
    pub translation_date: Option<String>,
    /// Curated translations by lang key. They win over phrase substitution.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    /// Key -> translation files (lang JSON or `.lang`), merged before `overrides`.
    #[serde(default)]
    pub override_files: Vec<PathBuf>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

impl ModProfile {
    /// Read a profile. Dictionary paths resolve against the profile's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let profile = Self::from_toml(&contents, base).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            ConfigError::Invalid { message, .. } => ConfigError::Invalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        log::debug!(
            "profile {}: {} dictionaries, {} categories",
            profile.mod_id,
            profile.dictionaries.len(),
            profile.categories.len()
        );
        Ok(profile)
    }

    /// Parse and validate; relative file paths are joined onto `base`.
    pub fn from_toml(contents: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut profile: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: base.to_path_buf(),
            message: e.to_string(),
        })?;

        for path in profile.dictionaries.iter_mut().chain(profile.override_files.iter_mut()) {
            resolve(base, path);
        }
        for module in &mut profile.modules {
            resolve(base, &mut module.en);
            resolve(base, &mut module.ja);
        }

        profile.validate().map_err(|message| ConfigError::Invalid {
            path: base.to_path_buf(),
            message,
        })?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mod_id.trim().is_empty() {
            return Err("mod_id must not be empty".to_string());
        }
        if self.dictionaries.is_empty() && self.modules.is_empty() {
            return Err("at least one dictionary (or [[modules]] entry) is required".to_string());
        }
        let mut names = HashSet::new();
        for category in &self.categories {
            if category.prefix.is_empty() {
                return Err(format!("category '{}' has an empty prefix", category.name));
            }
            if !names.insert(category.name.as_str()) {
                return Err(format!("duplicate category name '{}'", category.name));
            }
        }
        let mut ids = HashSet::new();
        for module in &self.modules {
            if module.id.trim().is_empty() {
                return Err(format!("module '{}' has an empty id", module.name));
            }
            if !ids.insert(module.id.as_str()) {
                return Err(format!("duplicate module id '{}'", module.id));
            }
        }
        for (key, target) in &self.overrides {
            if key.is_empty() {
                return Err(format!("override with an empty key (target '{target}')"));
            }
            if target.is_empty() {
                return Err(format!("override '{key}' has an empty translation"));
            }
        }
        Ok(())
    }

    /// Module version if set, otherwise the profile version.
    pub fn module_version<'a>(&'a self, module: &'a ModuleSpec) -> &'a str {
        module.version.as_deref().unwrap_or(&self.version)
    }

    /// Book date if set, then the profile date.
    pub fn book_date(&self) -> Option<&str> {
        self.book
            .as_ref()
            .and_then(|b| b.translation_date.as_deref())
            .or(self.translation_date.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.mod_id)
    }

    /// Profile mode if set, otherwise `fallback`.
    pub fn effective_mode(&self, fallback: SubstitutionMode) -> SubstitutionMode {
        self.mode.unwrap_or(fallback)
    }
}

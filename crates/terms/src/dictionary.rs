use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TermError;

/// One source phrase and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub source: String,
    pub target: String,
}

impl TermEntry {
    /// Phrase length in characters. This is the ordering key for substitution.
    pub fn char_len(&self) -> usize {
        self.source.chars().count()
    }
}

/// Ordered term dictionary with unique source phrases.
///
/// Insertion order is kept. Re-inserting a source replaces its target but
/// keeps the original position, so equal-length ties resolve the same way
/// the file was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDictionary {
    pub name: Option<String>,
    entries: Vec<TermEntry>,
    index: HashMap<String, usize>,
}

impl TermDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a term. Returns the previous target, if any.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Option<String>, TermError> {
        let source = source.into();
        let target = target.into();
        if source.is_empty() {
            return Err(TermError::EmptyPhrase { target });
        }

        if let Some(&i) = self.index.get(&source) {
            let previous = std::mem::replace(&mut self.entries[i].target, target);
            return Ok(Some(previous));
        }

        self.index.insert(source.clone(), self.entries.len());
        self.entries.push(TermEntry { source, target });
        Ok(None)
    }

    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut dict = Self::new();
        for (source, target) in pairs {
            dict.insert(source, target)?;
        }
        Ok(dict)
    }

    /// Parse the TOML dictionary format:
    ///
    /// ```toml
    /// name = "tconstruct"
    ///
    /// [terms]
    /// "Seared Stone" = "焼成石"
    /// "Stone" = "石"
    /// ```
    pub fn from_toml(input: &str) -> Result<Self, TermError> {
        let table: toml::Table =
            toml::from_str(input).map_err(|e| TermError::Parse(e.to_string()))?;

        let mut dict = Self::new();
        dict.name = table
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let terms = match table.get("terms") {
            Some(toml::Value::Table(t)) => t,
            Some(_) => return Err(TermError::Parse("'terms' must be a table".into())),
            None => return Err(TermError::Parse("missing [terms] table".into())),
        };

        for (source, value) in terms {
            let target = value.as_str().ok_or_else(|| TermError::NonStringTarget {
                source: source.clone(),
            })?;
            dict.insert(source.as_str(), target)?;
        }

        Ok(dict)
    }

    /// Parse a flat JSON object of `source -> target`.
    pub fn from_json(input: &str) -> Result<Self, TermError> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(input).map_err(|e| TermError::Parse(e.to_string()))?;

        let mut dict = Self::new();
        for (source, value) in map {
            let target = value
                .as_str()
                .ok_or_else(|| TermError::NonStringTarget { source: source.clone() })?;
            dict.insert(source.as_str(), target)?;
        }
        Ok(dict)
    }

    /// Load a dictionary file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, TermError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let content = std::fs::read_to_string(path)
            .map_err(|e| TermError::Io(format!("{}: {e}", path.display())))?;

        let mut dict = match ext.as_str() {
            "toml" => Self::from_toml(&content)?,
            "json" => Self::from_json(&content)?,
            other => return Err(TermError::UnsupportedFormat(other.to_string())),
        };

        if dict.name.is_none() {
            dict.name = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
        }
        log::debug!("loaded {} terms from {}", dict.len(), path.display());
        Ok(dict)
    }

    /// Load several dictionaries and merge them in order (later files win).
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self, TermError> {
        let mut merged = Self::new();
        for path in paths {
            let dict = Self::load(path.as_ref())?;
            merged.merge(&dict);
        }
        Ok(merged)
    }

    /// Merge `other` into `self`. Targets from `other` win on conflict.
    pub fn merge(&mut self, other: &TermDictionary) {
        for entry in &other.entries {
            // Sources in an existing dictionary are already non-empty.
            let _ = self.insert(entry.source.as_str(), entry.target.as_str());
        }
        if self.name.is_none() {
            self.name = other.name.clone();
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.index.get(source).map(|&i| self.entries[i].target.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TermEntry> {
        self.entries.iter()
    }

    /// Entries ordered by descending phrase length; ties keep insertion order.
    pub fn by_length_desc(&self) -> Vec<&TermEntry> {
        let mut ordered: Vec<&TermEntry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| b.char_len().cmp(&a.char_len()));
        ordered
    }
}

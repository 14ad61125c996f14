use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle tier of a translation. Ordered: draft < translated < verified < official.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Draft,
    Translated,
    Verified,
    Official,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Translated => "translated",
            Self::Verified => "verified",
            Self::Official => "official",
        }
    }

    /// Terminal tier: reconciliation never writes over it.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Official)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ReconError;

    /// Accepts the four tiers plus the older store values
    /// (`pending`, `needs_review` → draft; `inherited` → translated).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" | "pending" | "needs_review" => Ok(Self::Draft),
            "translated" | "inherited" => Ok(Self::Translated),
            "verified" => Ok(Self::Verified),
            "official" => Ok(Self::Official),
            other => Err(ReconError::UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Identity of a translation record: the logical key plus the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordKey {
    pub key: String,
    pub source_text: String,
}

impl RecordKey {
    pub fn new(key: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source_text: source_text.into(),
        }
    }
}

/// A persisted translation. `id` is the store's row id (0 when in-memory only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub id: i64,
    pub key: String,
    pub source_text: String,
    pub target_text: String,
    pub status: Status,
}

impl TranslationRecord {
    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(self.key.as_str(), self.source_text.as_str())
    }
}

// ---------------------------------------------------------------------------
// Incoming
// ---------------------------------------------------------------------------

/// One CSV row, fields trimmed. Missing cells read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRow {
    pub key: String,
    pub source_text: String,
    pub target_text: String,
}

impl IncomingRow {
    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(self.key.as_str(), self.source_text.as_str())
    }

    /// Rows without a key or without a target are not usable for updates.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.target_text.is_empty()
    }
}

/// Incoming translations keyed by `(key, source_text)`.
#[derive(Debug, Clone, Default)]
pub struct IncomingSet {
    pub entries: HashMap<RecordKey, String>,
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub duplicate_keys: usize,
}

impl IncomingSet {
    /// Build the lookup, dropping incomplete rows. A repeated key keeps the last row.
    pub fn from_rows(rows: &[IncomingRow]) -> Self {
        let mut set = Self {
            rows_read: rows.len(),
            ..Self::default()
        };

        for row in rows {
            if !row.is_complete() {
                set.rows_rejected += 1;
                continue;
            }
            if set
                .entries
                .insert(row.record_key(), row.target_text.clone())
                .is_some()
            {
                set.duplicate_keys += 1;
            }
        }

        set
    }

    pub fn get(&self, key: &RecordKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(RecordKey, String)> for IncomingSet {
    fn from_iter<I: IntoIterator<Item = (RecordKey, String)>>(iter: I) -> Self {
        let entries: HashMap<RecordKey, String> = iter.into_iter().collect();
        Self {
            rows_read: entries.len(),
            entries,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Where a single existing record lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconBucket {
    Updated,
    SkippedOfficial,
    SkippedUnchanged,
    Unmatched,
}

impl std::fmt::Display for ReconBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::SkippedOfficial => write!(f, "skipped_official"),
            Self::SkippedUnchanged => write!(f, "skipped_unchanged"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub updated: usize,
    pub skipped_official: usize,
    pub skipped_unchanged: usize,
    pub unmatched: usize,
}

impl ReconSummary {
    pub fn record(&mut self, bucket: ReconBucket) {
        match bucket {
            ReconBucket::Updated => self.updated += 1,
            ReconBucket::SkippedOfficial => self.skipped_official += 1,
            ReconBucket::SkippedUnchanged => self.skipped_unchanged += 1,
            ReconBucket::Unmatched => self.unmatched += 1,
        }
    }

    /// Records visited. Equals the number of existing records.
    pub fn total(&self) -> usize {
        self.updated + self.skipped_official + self.skipped_unchanged + self.unmatched
    }

    /// Records that had an incoming counterpart.
    pub fn matched(&self) -> usize {
        self.total() - self.unmatched
    }
}

/// A pending write: set `target_text` of translation `id`, status becomes translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    pub id: i64,
    pub key: String,
    pub target_text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconPlan {
    pub summary: ReconSummary,
    pub updates: Vec<RecordUpdate>,
}

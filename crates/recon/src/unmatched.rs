use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{IncomingRow, RecordKey};

/// Preview length for source/target text in reports, in characters.
pub const PREVIEW_CHARS: usize = 50;

/// A CSV row with no `(key, source_text)` counterpart in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedEntry {
    pub key: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixCount {
    pub prefix: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnmatchedReport {
    pub csv_total: usize,
    pub matched: usize,
    /// Unmatched rows grouped by key prefix, most frequent first.
    pub prefixes: Vec<PrefixCount>,
    pub entries: Vec<UnmatchedEntry>,
}

impl UnmatchedReport {
    pub fn unmatched(&self) -> usize {
        self.entries.len()
    }
}

/// Text before the first `.`, or the whole key.
pub fn key_prefix(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

/// Cut to [`PREVIEW_CHARS`] characters, marking the cut with `...`.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Check every CSV row (complete or not) against the store's source keys.
pub fn find_unmatched(sources: &HashSet<RecordKey>, rows: &[IncomingRow]) -> UnmatchedReport {
    let mut report = UnmatchedReport {
        csv_total: rows.len(),
        ..UnmatchedReport::default()
    };
    let mut prefix_counts: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        if sources.contains(&row.record_key()) {
            report.matched += 1;
            continue;
        }
        *prefix_counts.entry(key_prefix(&row.key)).or_insert(0) += 1;
        report.entries.push(UnmatchedEntry {
            key: row.key.clone(),
            source: preview(&row.source_text),
            target: preview(&row.target_text),
        });
    }

    let mut prefixes: Vec<PrefixCount> = prefix_counts
        .into_iter()
        .map(|(prefix, count)| PrefixCount { prefix: prefix.to_string(), count })
        .collect();
    prefixes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.prefix.cmp(&b.prefix)));
    report.prefixes = prefixes;

    report
}

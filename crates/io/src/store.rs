// SQLite translation store: sources keyed by (key, source_text), one translation per target language

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use moddict_recon::{IncomingRow, RecordKey, RecordUpdate, Status, TranslationRecord};

use crate::lang::LangFile;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS translation_sources (
    id INTEGER PRIMARY KEY,
    key TEXT NOT NULL,
    source_text TEXT NOT NULL,
    UNIQUE (key, source_text)
);

CREATE TABLE IF NOT EXISTS translations (
    id INTEGER PRIMARY KEY,
    source_id INTEGER NOT NULL REFERENCES translation_sources(id),
    target_lang TEXT NOT NULL,
    target_text TEXT,
    status TEXT NOT NULL DEFAULT 'draft',  -- draft, translated, verified, official
    UNIQUE (source_id, target_lang)
);

CREATE INDEX IF NOT EXISTS idx_translations_lang ON translations (target_lang);
"#;

/// What an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub entries: usize,
    pub sources_added: usize,
    pub translations_added: usize,
    /// Existing non-official translations replaced by the mod's own value.
    pub promoted_official: usize,
}

pub struct TranslationStore {
    conn: Connection,
}

impl TranslationStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| e.to_string())?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }

    /// Insert missing sources and `target_lang` translations for every entry of `source`.
    ///
    /// New translations are `draft` with no target, or `official` when `official`
    /// carries a non-empty value for the key. An official value also takes over
    /// an existing non-official translation.
    pub fn import_lang(
        &mut self,
        source: &LangFile,
        official: Option<&LangFile>,
        target_lang: &str,
    ) -> Result<ImportStats, String> {
        let mut stats = ImportStats {
            entries: source.len(),
            ..ImportStats::default()
        };

        let tx = self.conn.transaction().map_err(|e| e.to_string())?;
        {
            let mut insert_source = tx
                .prepare("INSERT OR IGNORE INTO translation_sources (key, source_text) VALUES (?1, ?2)")
                .map_err(|e| e.to_string())?;
            let mut find_source = tx
                .prepare("SELECT id FROM translation_sources WHERE key = ?1 AND source_text = ?2")
                .map_err(|e| e.to_string())?;
            let mut insert_translation = tx
                .prepare(
                    "INSERT OR IGNORE INTO translations (source_id, target_lang, target_text, status) VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(|e| e.to_string())?;
            let mut promote = tx
                .prepare(
                    "UPDATE translations SET target_text = ?1, status = 'official' WHERE source_id = ?2 AND target_lang = ?3 AND status != 'official'",
                )
                .map_err(|e| e.to_string())?;

            for (key, text) in &source.entries {
                stats.sources_added += insert_source.execute(params![key, text]).map_err(|e| e.to_string())?;
                let source_id: i64 = find_source
                    .query_row(params![key, text], |row| row.get(0))
                    .map_err(|e| e.to_string())?;

                let official_text = official.and_then(|o| o.get(key)).filter(|t| !t.is_empty());
                let (target, status) = match official_text {
                    Some(t) => (Some(t), Status::Official),
                    None => (None, Status::Draft),
                };

                let added = insert_translation
                    .execute(params![source_id, target_lang, target, status.as_str()])
                    .map_err(|e| e.to_string())?;
                stats.translations_added += added;

                if added == 0 {
                    if let Some(t) = official_text {
                        stats.promoted_official +=
                            promote.execute(params![t, source_id, target_lang]).map_err(|e| e.to_string())?;
                    }
                }
            }
        }
        tx.commit().map_err(|e| e.to_string())?;

        log::info!(
            "imported {} entries: {} new sources, {} new translations, {} promoted to official",
            stats.entries,
            stats.sources_added,
            stats.translations_added,
            stats.promoted_official
        );
        Ok(stats)
    }

    /// All translations for `target_lang`, joined with their source. NULL targets read as empty.
    pub fn load_records(&self, target_lang: &str) -> Result<Vec<TranslationRecord>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.id, ts.key, ts.source_text, t.target_text, t.status
                 FROM translation_sources ts
                 JOIN translations t ON t.source_id = ts.id
                 WHERE t.target_lang = ?1
                 ORDER BY t.id",
            )
            .map_err(|e| e.to_string())?;

        let rows = stmt
            .query_map(params![target_lang], |row| {
                let id: i64 = row.get(0)?;
                let key: String = row.get(1)?;
                let source_text: String = row.get(2)?;
                let target_text: Option<String> = row.get(3)?;
                let status: String = row.get(4)?;
                Ok((id, key, source_text, target_text, status))
            })
            .map_err(|e| e.to_string())?;

        let mut records = Vec::new();
        for row in rows {
            let (id, key, source_text, target_text, status) = row.map_err(|e| e.to_string())?;
            let status: Status = status.parse().map_err(|e| format!("translation {id}: {e}"))?;
            records.push(TranslationRecord {
                id,
                key,
                source_text,
                target_text: target_text.unwrap_or_default(),
                status,
            });
        }

        log::debug!("loaded {} {target_lang} records", records.len());
        Ok(records)
    }

    /// Every `(key, source_text)` pair in the store, any language.
    pub fn source_keys(&self) -> Result<HashSet<RecordKey>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, source_text FROM translation_sources")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], |row| Ok(RecordKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| e.to_string())?;

        let mut keys = HashSet::new();
        for key in rows {
            keys.insert(key.map_err(|e| e.to_string())?);
        }
        Ok(keys)
    }

    /// Write reconciliation updates, committing every `commit_every` rows.
    ///
    /// A failure leaves earlier batches committed. Returns the number of rows written.
    pub fn apply_updates(&mut self, updates: &[RecordUpdate], commit_every: usize) -> Result<usize, String> {
        let mut written = 0;
        for batch in updates.chunks(commit_every.max(1)) {
            let tx = self.conn.transaction().map_err(|e| e.to_string())?;
            {
                let mut stmt = tx
                    .prepare_cached("UPDATE translations SET target_text = ?1, status = ?2 WHERE id = ?3")
                    .map_err(|e| e.to_string())?;
                for update in batch {
                    stmt.execute(params![update.target_text, Status::Translated.as_str(), update.id])
                        .map_err(|e| format!("translation {} ({}): {e}", update.id, update.key))?;
                }
            }
            tx.commit().map_err(|e| e.to_string())?;
            written += batch.len();
            log::info!("updated {written} translations");
        }
        Ok(written)
    }

    /// Rows for `target_lang`, sorted by key then source. NULL targets export as empty.
    pub fn export_rows(&self, target_lang: &str) -> Result<Vec<IncomingRow>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT ts.key, ts.source_text, COALESCE(t.target_text, '')
                 FROM translation_sources ts
                 JOIN translations t ON t.source_id = ts.id
                 WHERE t.target_lang = ?1
                 ORDER BY ts.key, ts.source_text",
            )
            .map_err(|e| e.to_string())?;

        let rows = stmt
            .query_map(params![target_lang], |row| {
                Ok(IncomingRow {
                    key: row.get(0)?,
                    source_text: row.get(1)?,
                    target_text: row.get(2)?,
                })
            })
            .map_err(|e| e.to_string())?;

        rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
    }

    /// Translation counts per status for `target_lang`.
    pub fn count_by_status(&self, target_lang: &str) -> Result<BTreeMap<String, usize>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM translations WHERE target_lang = ?1 GROUP BY status")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map(params![target_lang], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| e.to_string())?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (status, count) = row.map_err(|e| e.to_string())?;
            counts.insert(status, count as usize);
        }
        Ok(counts)
    }

    /// Current target of `(key, source_text)` in `target_lang`, if the translation exists.
    #[cfg(test)]
    pub fn lookup(&self, key: &str, source_text: &str, target_lang: &str) -> Result<Option<(String, Status)>, String> {
        use rusqlite::OptionalExtension;

        let found: Option<(Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT t.target_text, t.status
                 FROM translation_sources ts
                 JOIN translations t ON t.source_id = ts.id
                 WHERE ts.key = ?1 AND ts.source_text = ?2 AND t.target_lang = ?3",
                params![key, source_text, target_lang],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| e.to_string())?;

        match found {
            Some((target, status)) => {
                let status: Status = status.parse().map_err(|e| format!("{key}: {e}"))?;
                Ok(Some((target.unwrap_or_default(), status)))
            }
            None => Ok(None),
        }
    }
}

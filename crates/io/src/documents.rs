// Translation documents written as YAML: per-category term output and en/ja bilingual tables

use std::collections::BTreeMap;

use serde::Serialize;

use moddict_recon::Status;
use moddict_terms::Substituter;

use crate::lang::LangFile;

/// Mod metadata stamped on every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModMeta {
    pub mod_id: String,
    pub version: String,
    pub mc_version: String,
}

// ============================================================================
// Category documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub key: String,
    pub source: String,
    pub target: String,
    /// `verified` for curated overrides, `translated` when the dictionary
    /// changed the text, `draft` for marked source text.
    pub status: Status,
}

/// Turns one lang entry into a category entry: curated override first,
/// then phrase substitution, then `marker` + source.
pub struct EntryTranslator<'a> {
    pub substituter: &'a Substituter,
    pub overrides: &'a BTreeMap<String, String>,
    pub marker: &'a str,
}

impl EntryTranslator<'_> {
    pub fn translate(&self, key: &str, source: &str) -> CategoryEntry {
        let (target, status) = match self.overrides.get(key) {
            Some(curated) => (curated.clone(), Status::Verified),
            None => {
                let substituted = self.substituter.apply(source);
                if substituted == source {
                    (format!("{}{source}", self.marker), Status::Draft)
                } else {
                    (substituted, Status::Translated)
                }
            }
        };
        CategoryEntry {
            key: key.to_string(),
            source: source.to_string(),
            target,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDocument {
    pub mod_id: String,
    pub version: String,
    pub mc_version: String,
    pub category: String,
    /// Entries under the prefix, before any limit.
    pub total_entries: usize,
    pub translations: Vec<CategoryEntry>,
    /// Entries the dictionary changed.
    #[serde(skip)]
    pub translated: usize,
    /// Entries taken from overrides.
    #[serde(skip)]
    pub verified: usize,
}

/// Translate every entry whose key starts with `prefix`, in key order.
/// `limit` caps the `translations` list only.
pub fn build_category_document(
    lang: &LangFile,
    meta: &ModMeta,
    category: &str,
    prefix: &str,
    translator: &EntryTranslator<'_>,
    limit: Option<usize>,
) -> CategoryDocument {
    let mut doc = CategoryDocument {
        mod_id: meta.mod_id.clone(),
        version: meta.version.clone(),
        mc_version: meta.mc_version.clone(),
        category: category.to_string(),
        total_entries: 0,
        translations: Vec::new(),
        translated: 0,
        verified: 0,
    };

    for (key, source) in lang.with_prefix(prefix) {
        doc.total_entries += 1;
        if limit.is_some_and(|max| doc.translations.len() >= max) {
            continue;
        }
        let entry = translator.translate(key, source);
        match entry.status {
            Status::Verified => doc.verified += 1,
            Status::Translated => doc.translated += 1,
            _ => {}
        }
        doc.translations.push(entry);
    }

    log::debug!(
        "category {category} ({prefix}): {} entries, {} written, {} translated, {} verified",
        doc.total_entries,
        doc.translations.len(),
        doc.translated,
        doc.verified
    );
    doc
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalStats {
    /// Every key in the source file.
    pub total_keys: usize,
    pub verified_translations: usize,
    /// Written entries per category.
    pub categories: BTreeMap<String, usize>,
}

/// All categories of one mod in a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalDocument {
    pub mod_id: String,
    pub mod_name: String,
    pub version: String,
    pub mc_version: String,
    pub translation_date: String,
    pub stats: FinalStats,
    pub categories: BTreeMap<String, Vec<CategoryEntry>>,
}

pub fn build_final_document(
    meta: &ModMeta,
    mod_name: &str,
    translation_date: &str,
    total_keys: usize,
    docs: &[CategoryDocument],
) -> FinalDocument {
    let mut stats = FinalStats {
        total_keys,
        verified_translations: 0,
        categories: BTreeMap::new(),
    };
    let mut categories = BTreeMap::new();
    for doc in docs {
        stats.verified_translations += doc.verified;
        stats.categories.insert(doc.category.clone(), doc.translations.len());
        categories.insert(doc.category.clone(), doc.translations.clone());
    }

    FinalDocument {
        mod_id: meta.mod_id.clone(),
        mod_name: mod_name.to_string(),
        version: meta.version.clone(),
        mc_version: meta.mc_version.clone(),
        translation_date: translation_date.to_string(),
        stats,
        categories,
    }
}

// ============================================================================
// Bilingual documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilingualEntry {
    pub key: String,
    pub en: String,
    pub ja: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilingualCategory {
    pub count: usize,
    pub translations: Vec<BilingualEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_entries: usize,
    pub translated_entries: usize,
    /// Percentage with one decimal, e.g. `"87.5%"`.
    pub translation_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilingualDocument {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mod_id: String,
    pub module: String,
    pub version: String,
    pub statistics: Statistics,
    pub categories: BTreeMap<String, BilingualCategory>,
}

/// First key segment, or `other` for keys without a dot.
pub fn bilingual_category(key: &str) -> &str {
    match key.split_once('.') {
        Some((first, _)) => first,
        None => "other",
    }
}

pub fn translation_rate(translated: usize, total: usize) -> String {
    let rate = if total > 0 {
        translated as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    format!("{rate:.1}%")
}

/// Pair every English entry with its Japanese value (empty when missing).
pub fn build_bilingual_document(en: &LangFile, ja: &LangFile, module: &str, meta: &ModMeta) -> BilingualDocument {
    let mut categories: BTreeMap<String, BilingualCategory> = BTreeMap::new();
    let mut translated = 0;

    for (key, en_text) in &en.entries {
        let ja_text = ja.get(key).unwrap_or("");
        if !ja_text.is_empty() {
            translated += 1;
        }
        let category = categories
            .entry(bilingual_category(key).to_string())
            .or_insert_with(|| BilingualCategory {
                count: 0,
                translations: Vec::new(),
            });
        category.count += 1;
        category.translations.push(BilingualEntry {
            key: key.clone(),
            en: en_text.clone(),
            ja: ja_text.to_string(),
        });
    }

    BilingualDocument {
        mod_id: meta.mod_id.clone(),
        module: module.to_string(),
        version: meta.version.clone(),
        statistics: Statistics {
            total_entries: en.len(),
            translated_entries: translated,
            translation_rate: translation_rate(translated, en.len()),
        },
        categories,
    }
}

// ============================================================================
// Multi-module documents
// ============================================================================

/// Version written when neither the command line nor the profile gives one.
pub const DEFAULT_VERSION: &str = "10.4.x";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSection {
    pub id: String,
    pub name: String,
    pub version: String,
    pub statistics: Statistics,
    pub categories: BTreeMap<String, BilingualCategory>,
}

impl ModuleSection {
    pub fn from_document(id: &str, doc: BilingualDocument) -> Self {
        Self {
            id: id.to_string(),
            name: doc.module,
            version: doc.version,
            statistics: doc.statistics,
            categories: doc.categories,
        }
    }
}

/// Every module of a mod, one section each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegratedDocument {
    pub mod_id: String,
    pub mod_name: String,
    pub minecraft_version: String,
    pub modules: Vec<ModuleSection>,
}

impl IntegratedDocument {
    /// Totals over all modules.
    pub fn statistics(&self) -> Statistics {
        let total: usize = self.modules.iter().map(|m| m.statistics.total_entries).sum();
        let translated: usize = self.modules.iter().map(|m| m.statistics.translated_entries).sum();
        Statistics {
            total_entries: total,
            translated_entries: translated,
            translation_rate: translation_rate(translated, total),
        }
    }
}

// Patchouli guide book entries: translate names and page text, keep recipes and layout

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use moddict_terms::Substituter;

#[derive(Clone, Copy)]
enum Field {
    Translated,
    Copied,
}

/// Page fields after `text`, in output order, with their output names.
const PAGE_FIELDS: [(&str, &str, Field); 12] = [
    ("title", "title", Field::Translated),
    ("heading", "heading", Field::Translated),
    ("recipe", "recipe", Field::Copied),
    ("images", "images", Field::Copied),
    ("border", "border", Field::Copied),
    ("anchor", "anchor", Field::Copied),
    ("a.heading", "a_heading", Field::Translated),
    ("a.recipe", "a_recipe", Field::Copied),
    ("b.heading", "b_heading", Field::Translated),
    ("b.recipe", "b_recipe", Field::Copied),
    ("c.heading", "c_heading", Field::Translated),
    ("c.recipe", "c_recipe", Field::Copied),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedText {
    pub source: String,
    pub translation: String,
}

impl TranslatedText {
    fn new(source: &str, substituter: &Substituter) -> Self {
        Self {
            source: source.to_string(),
            translation: substituter.apply(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    pub id: String,
    pub file: String,
    pub name: TranslatedText,
    pub icon: String,
    pub category: String,
    pub page_count: usize,
    pub pages: Vec<Map<String, Value>>,
}

/// Header fields plus the translated entries of one book format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDocument<E = BookEntry> {
    pub mod_id: String,
    pub mc_version: String,
    pub source_language: String,
    pub target_language: String,
    pub category: String,
    pub translation_date: String,
    pub total_entries: usize,
    pub entries: Vec<E>,
}

impl<E> BookDocument<E> {
    pub fn new(mod_id: &str, mc_version: &str, category: &str, translation_date: &str, target_language: &str, entries: Vec<E>) -> Self {
        Self {
            mod_id: mod_id.to_string(),
            mc_version: mc_version.to_string(),
            source_language: "en_us".to_string(),
            target_language: target_language.to_string(),
            category: category.to_string(),
            translation_date: translation_date.to_string(),
            total_entries: entries.len(),
            entries,
        }
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, name: &str) -> &'a str {
    obj.get(name).and_then(Value::as_str).unwrap_or("")
}

fn translate_page(index: usize, page: &Map<String, Value>, substituter: &Substituter) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("page".into(), Value::from(index));
    out.insert("type".into(), Value::from(str_field(page, "type")));

    if let Some(text) = page.get("text") {
        match text.as_str() {
            Some(text) => {
                out.insert("source".into(), Value::from(text));
                out.insert("translation".into(), Value::from(substituter.apply(text)));
            }
            None => {
                out.insert("source".into(), text.clone());
            }
        }
    }

    for (field, name, kind) in PAGE_FIELDS {
        let Some(value) = page.get(field) else {
            continue;
        };
        let value = match (kind, value.as_str()) {
            (Field::Translated, Some(text)) => {
                serde_json::json!({"source": text, "translation": substituter.apply(text)})
            }
            _ => value.clone(),
        };
        out.insert(name.into(), value);
    }

    out
}

/// Translate one entry. `file_name` is the entry's file name (`blood_orb.json`);
/// the id is the name without `.json`.
pub fn translate_entry(entry: &Value, file_name: &str, substituter: &Substituter) -> Result<BookEntry, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| format!("{file_name}: book entry is not a JSON object"))?;

    let pages: Vec<Map<String, Value>> = match obj.get("pages") {
        Some(Value::Array(pages)) => pages
            .iter()
            .enumerate()
            .filter_map(|(i, page)| match page.as_object() {
                Some(page) => Some(translate_page(i, page, substituter)),
                None => {
                    log::warn!("{file_name}: page {i} is not an object, skipped");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(BookEntry {
        id: file_name.strip_suffix(".json").unwrap_or(file_name).to_string(),
        file: file_name.to_string(),
        name: TranslatedText::new(str_field(obj, "name"), substituter),
        icon: str_field(obj, "icon").to_string(),
        category: str_field(obj, "category").to_string(),
        page_count: pages.len(),
        pages,
    })
}

/// Directory of `entry` below `root`, `/`-separated; `main` for entries
/// directly in `root`, outside it, or when no root is given.
pub fn category_path(root: Option<&Path>, entry: &Path) -> String {
    let relative = root
        .and_then(|root| entry.parent()?.strip_prefix(root).ok())
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();
    if relative.is_empty() {
        "main".to_string()
    } else {
        relative
    }
}

/// An entry as written to the JSON dump: the entry plus where it was found.
#[derive(Debug, Clone, Serialize)]
pub struct DumpEntry<'a> {
    #[serde(flatten)]
    pub entry: &'a BookEntry,
    #[serde(rename = "_category_path")]
    pub category_path: &'a str,
}

/// Plain-text overview: one block per entry with name, icon and page count.
pub fn translation_summary(entries: &[BookEntry]) -> String {
    let mut out = format!("# Translated {} entries\n\n", entries.len());
    for e in entries {
        out.push_str(&format!("### {} ###\n", e.file));
        out.push_str(&format!("Name: {} -> {}\n", e.name.source, e.name.translation));
        out.push_str(&format!("Icon: {}\n", e.icon));
        out.push_str(&format!("Pages: {}\n\n", e.page_count));
    }
    out
}

/// Read and translate an entry file.
pub fn read_entry(path: &Path, substituter: &Substituter) -> Result<BookEntry, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("{}: invalid file name", path.display()))?;
    translate_entry(&value, file_name, substituter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moddict_terms::{SubstitutionMode, TermDictionary};
    use serde_json::json;

    fn substituter() -> Substituter {
        let dict = TermDictionary::from_pairs([
            ("Alchemy Table", "錬金術テーブル"),
            ("Blood Orb", "ブラッドオーブ"),
            ("Potion", "ポーション"),
        ])
        .unwrap();
        Substituter::new(&dict, SubstitutionMode::Sequential).unwrap()
    }

    #[test]
    fn entry_fields_and_pages() {
        let entry = json!({
            "name": "Alchemy Table",
            "icon": "bloodmagic:alchemytable",
            "category": "bloodmagic:alchemy_table",
            "pages": [
                {"type": "patchouli:text", "text": "The Alchemy Table brews a Potion."},
                {"type": "patchouli:crafting", "title": "Alchemy Table", "recipe": "bloodmagic:alchemy_table", "anchor": "recipe"},
                {"type": "patchouli:crafting", "a.heading": "Blood Orb", "a.recipe": "bloodmagic:weak_orb", "b.recipe": "bloodmagic:apprentice_orb"}
            ]
        });
        let e = translate_entry(&entry, "alchemy_table.json", &substituter()).unwrap();

        assert_eq!(e.id, "alchemy_table");
        assert_eq!(e.name.translation, "錬金術テーブル");
        assert_eq!(e.page_count, 3);

        assert_eq!(e.pages[0]["page"], json!(0));
        assert_eq!(e.pages[0]["source"], json!("The Alchemy Table brews a Potion."));
        assert_eq!(e.pages[0]["translation"], json!("The 錬金術テーブル brews a ポーション."));

        assert_eq!(e.pages[1]["title"], json!({"source": "Alchemy Table", "translation": "錬金術テーブル"}));
        assert_eq!(e.pages[1]["recipe"], json!("bloodmagic:alchemy_table"));
        assert_eq!(e.pages[1]["anchor"], json!("recipe"));

        assert_eq!(e.pages[2]["a_heading"]["translation"], json!("ブラッドオーブ"));
        assert_eq!(e.pages[2]["a_recipe"], json!("bloodmagic:weak_orb"));
        assert_eq!(e.pages[2]["b_recipe"], json!("bloodmagic:apprentice_orb"));
        assert!(!e.pages[2].contains_key("c_recipe"));
    }

    #[test]
    fn page_field_order_follows_layout() {
        let entry = json!({"name": "X", "pages": [{"recipe": "r", "title": "T", "text": "t", "type": "patchouli:spotlight"}]});
        let e = translate_entry(&entry, "x.json", &substituter()).unwrap();
        let keys: Vec<&str> = e.pages[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["page", "type", "source", "translation", "title", "recipe"]);
    }

    #[test]
    fn multi_recipe_page_interleaves_headings_and_recipes() {
        let entry = json!({"name": "Orbs", "pages": [{
            "b.recipe": "bloodmagic:apprentice_orb",
            "b.heading": "Apprentice Blood Orb",
            "a.recipe": "bloodmagic:weak_orb",
            "a.heading": "Weak Blood Orb",
            "recipe": "bloodmagic:orb",
            "type": "patchouli:crafting"
        }]});
        let e = translate_entry(&entry, "orbs.json", &substituter()).unwrap();
        let keys: Vec<&str> = e.pages[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["page", "type", "recipe", "a_heading", "a_recipe", "b_heading", "b_recipe"]);
        assert_eq!(e.pages[0]["b_heading"]["translation"], json!("Apprentice ブラッドオーブ"));
    }

    #[test]
    fn category_paths() {
        let root = Path::new("/book/alchemy_table");
        assert_eq!(category_path(Some(root), Path::new("/book/alchemy_table/potions.json")), "main");
        assert_eq!(category_path(Some(root), Path::new("/book/alchemy_table/anointments/holy_water.json")), "anointments");
        assert_eq!(
            category_path(Some(root), Path::new("/book/alchemy_table/potion_flasks/vanilla/speed.json")),
            "potion_flasks/vanilla"
        );
        assert_eq!(category_path(Some(root), Path::new("/elsewhere/x.json")), "main");
        assert_eq!(category_path(None, Path::new("/book/alchemy_table/anointments/a.json")), "main");
    }

    #[test]
    fn dump_entry_carries_category_path_last() {
        let e = translate_entry(&json!({"name": "Potion"}), "potions.json", &substituter()).unwrap();
        let value = serde_json::to_value(DumpEntry { entry: &e, category_path: "main" }).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.last(), Some(&"_category_path"));
        assert_eq!(value["name"]["translation"], json!("ポーション"));
    }

    #[test]
    fn summary_text() {
        let entry = json!({"name": "Alchemy Table", "icon": "bloodmagic:alchemytable", "pages": [{"type": "patchouli:text", "text": "t"}]});
        let e = translate_entry(&entry, "alchemy_table.json", &substituter()).unwrap();
        assert_eq!(
            translation_summary(&[e]),
            "# Translated 1 entries\n\n### alchemy_table.json ###\nName: Alchemy Table -> 錬金術テーブル\nIcon: bloodmagic:alchemytable\nPages: 1\n\n"
        );
    }

    #[test]
    fn missing_pages_and_non_object_entry() {
        let e = translate_entry(&json!({"name": "Empty"}), "empty.json", &substituter()).unwrap();
        assert_eq!(e.page_count, 0);
        assert_eq!(e.icon, "");
        assert!(translate_entry(&json!([1, 2]), "bad.json", &substituter()).is_err());
    }

    #[test]
    fn document_counts_entries() {
        let e = translate_entry(&json!({"name": "Potion"}), "potions.json", &substituter()).unwrap();
        let doc = BookDocument::new("bloodmagic", "1.16.3", "alchemy_table", "2025-11-29", "ja_jp", vec![e]);
        assert_eq!(doc.total_entries, 1);
        assert_eq!(doc.source_language, "en_us");
    }
}

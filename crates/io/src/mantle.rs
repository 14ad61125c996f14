// Mantle book pages (Tinkers' Construct): title, text runs and string lists translated in place

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use moddict_terms::Substituter;

/// String-array fields whose items are display text.
const LIST_FIELDS: [&str; 3] = ["properties", "entity", "block"];

/// One translatable string, addressed as `title`, `text`, `text[2].text`, `properties[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MantleField {
    pub path: String,
    pub source: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MantleEntry {
    pub id: String,
    pub file: String,
    pub field_count: usize,
    pub fields: Vec<MantleField>,
    /// The page with every field replaced by its translation.
    #[serde(skip)]
    pub translated: Value,
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Every non-empty translatable string of a page, in page order.
pub fn extract_fields(page: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let Some(obj) = page.as_object() else {
        return fields;
    };

    if let Some(title) = non_empty(obj.get("title")) {
        fields.push(("title".to_string(), title.to_string()));
    }

    match obj.get("text") {
        Some(Value::String(text)) if !text.is_empty() => {
            fields.push(("text".to_string(), text.clone()));
        }
        Some(Value::Array(runs)) => {
            for (i, run) in runs.iter().enumerate() {
                if let Some(text) = non_empty(run.get("text")) {
                    fields.push((format!("text[{i}].text"), text.to_string()));
                }
            }
        }
        _ => {}
    }

    for name in LIST_FIELDS {
        if let Some(Value::Array(items)) = obj.get(name) {
            for (i, item) in items.iter().enumerate() {
                if let Some(text) = non_empty(Some(item)) {
                    fields.push((format!("{name}[{i}]"), text.to_string()));
                }
            }
        }
    }

    fields
}

/// Write `translations` (by field path) back into `page`. Unknown paths are ignored.
pub fn apply_fields(page: &mut Value, translations: &HashMap<String, String>) {
    let Some(obj) = page.as_object_mut() else {
        return;
    };

    if let Some(t) = translations.get("title") {
        obj.insert("title".into(), Value::from(t.as_str()));
    }

    match obj.get_mut("text") {
        Some(text) if text.is_string() => {
            if let Some(t) = translations.get("text") {
                *text = Value::from(t.as_str());
            }
        }
        Some(Value::Array(runs)) => {
            for (i, run) in runs.iter_mut().enumerate() {
                if let (Some(t), Some(run)) = (translations.get(&format!("text[{i}].text")), run.as_object_mut()) {
                    run.insert("text".into(), Value::from(t.as_str()));
                }
            }
        }
        _ => {}
    }

    for name in LIST_FIELDS {
        if let Some(Value::Array(items)) = obj.get_mut(name) {
            for (i, item) in items.iter_mut().enumerate() {
                if let Some(t) = translations.get(&format!("{name}[{i}]")) {
                    *item = Value::from(t.as_str());
                }
            }
        }
    }
}

pub fn translate_page(page: &Value, file_name: &str, substituter: &Substituter) -> Result<MantleEntry, String> {
    if !page.is_object() {
        return Err(format!("{file_name}: book page is not a JSON object"));
    }

    let fields: Vec<MantleField> = extract_fields(page)
        .into_iter()
        .map(|(path, source)| MantleField {
            translation: substituter.apply(&source),
            path,
            source,
        })
        .collect();

    let translations: HashMap<String, String> =
        fields.iter().map(|f| (f.path.clone(), f.translation.clone())).collect();
    let mut translated = page.clone();
    apply_fields(&mut translated, &translations);

    Ok(MantleEntry {
        id: file_name.strip_suffix(".json").unwrap_or(file_name).to_string(),
        file: file_name.to_string(),
        field_count: fields.len(),
        fields,
        translated,
    })
}

pub fn read_page(path: &Path, substituter: &Substituter) -> Result<MantleEntry, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("{}: invalid file name", path.display()))?;
    translate_page(&value, file_name, substituter)
}

pub fn translation_summary(entries: &[MantleEntry]) -> String {
    let mut out = format!("# Translated {} pages\n\n", entries.len());
    for e in entries {
        out.push_str(&format!("### {} ###\n", e.file));
        if let Some(title) = e.fields.iter().find(|f| f.path == "title") {
            out.push_str(&format!("Title: {} -> {}\n", title.source, title.translation));
        }
        out.push_str(&format!("Fields: {}\n\n", e.field_count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use moddict_terms::{SubstitutionMode, TermDictionary};
    use serde_json::json;

    fn substituter() -> Substituter {
        let dict = TermDictionary::from_pairs([("Seared Stone", "焼成石"), ("Seared", "焼成"), ("Bricks", "レンガ"), ("Smeltery", "精錬炉")])
            .unwrap();
        Substituter::new(&dict, SubstitutionMode::Sequential).unwrap()
    }

    fn page() -> Value {
        json!({
            "title": "Smeltery",
            "text": [
                {"text": "The Smeltery is built from Seared Bricks."},
                {"text": "", "paragraph": true},
                {"text": "Seared Stone melts nothing.", "color": "dark_red"}
            ],
            "properties": ["Seared Stone", ""],
            "block": ["tconstruct:smeltery_controller"],
            "design": "smeltery"
        })
    }

    #[test]
    fn extracts_paths_in_page_order() {
        let paths: Vec<String> = extract_fields(&page()).into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["title", "text[0].text", "text[2].text", "properties[0]", "block[0]"]);

        let plain = extract_fields(&json!({"text": "Melting", "entity": ["Blaze"]}));
        assert_eq!(plain, vec![("text".to_string(), "Melting".to_string()), ("entity[0]".to_string(), "Blaze".to_string())]);
    }

    #[test]
    fn translate_keeps_layout_fields() {
        let e = translate_page(&page(), "smeltery.json", &substituter()).unwrap();
        assert_eq!(e.id, "smeltery");
        assert_eq!(e.field_count, 5);
        assert_eq!(e.fields[1].translation, "The 精錬炉 is built from 焼成 レンガ.");

        let t = &e.translated;
        assert_eq!(t["title"], json!("精錬炉"));
        assert_eq!(t["text"][0]["text"], json!("The 精錬炉 is built from 焼成 レンガ."));
        assert_eq!(t["text"][1], json!({"text": "", "paragraph": true}));
        assert_eq!(t["text"][2]["color"], json!("dark_red"));
        assert_eq!(t["properties"], json!(["焼成石", ""]));
        assert_eq!(t["design"], json!("smeltery"));
    }

    #[test]
    fn apply_ignores_unknown_paths() {
        let mut value = json!({"text": "Melting", "properties": ["A"]});
        let translations = HashMap::from([
            ("text".to_string(), "溶融".to_string()),
            ("properties[3]".to_string(), "x".to_string()),
        ]);
        apply_fields(&mut value, &translations);
        assert_eq!(value, json!({"text": "溶融", "properties": ["A"]}));
    }

    #[test]
    fn rejects_non_object_pages() {
        assert!(translate_page(&json!(["Seared"]), "bad.json", &substituter()).is_err());
    }
}

// Minecraft language files: JSON (`en_us.json`) and legacy `key=value` (`en_US.lang`)

use std::collections::BTreeMap;
use std::path::Path;

/// A parsed language file. Keys are kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LangFile {
    pub entries: BTreeMap<String, String>,
    /// Entries dropped while parsing (non-string JSON values, empty `.lang` values).
    pub skipped: usize,
}

impl LangFile {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose key starts with `prefix`, in key order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Parse a JSON language file.
///
/// Strict JSON is tried first. On failure the text is retried with `//` and
/// `/* */` comments and trailing commas removed.
pub fn parse_json_lang(content: &str) -> Result<LangFile, String> {
    let content = strip_bom(content);
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => {
            let relaxed = strip_trailing_commas(&strip_comments(content));
            serde_json::from_str(&relaxed).map_err(|e| e.to_string())?
        }
    };

    let serde_json::Value::Object(map) = value else {
        return Err("language file is not a JSON object".to_string());
    };

    let mut lang = LangFile::default();
    for (key, value) in map {
        match value {
            serde_json::Value::String(text) => {
                lang.entries.insert(key, text);
            }
            other => {
                log::debug!("skipping non-string value for {key}: {other}");
                lang.skipped += 1;
            }
        }
    }
    Ok(lang)
}

/// Parse a legacy `.lang` file. Lines without `=` are ignored.
pub fn parse_legacy_lang(content: &str) -> LangFile {
    let mut lang = LangFile::default();
    for line in strip_bom(content).lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            lang.skipped += 1;
            continue;
        }
        lang.entries.insert(key.to_string(), value.to_string());
    }
    lang
}

/// Read a language file, choosing the parser from the extension (`.lang` or JSON).
pub fn read_lang_file(path: &Path) -> Result<LangFile, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

    let is_legacy = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lang"));

    let lang = if is_legacy {
        parse_legacy_lang(&content)
    } else {
        parse_json_lang(&content).map_err(|e| format!("{}: {e}", path.display()))?
    };

    log::debug!("{}: {} entries, {} skipped", path.display(), lang.len(), lang.skipped);
    Ok(lang)
}

/// Remove `//` and `/* */` comments outside string literals. Newlines are kept
/// so parse errors still point at the right line.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Drop commas that directly precede `}` or `]` (whitespace between is allowed).
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().copied().find(|c| !c.is_whitespace());
            if !matches!(next, Some('}' | ']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lang_skips_non_strings() {
        let lang = parse_json_lang(
            r#"{"block.tconstruct.seared_stone": "Seared Stone", "tconstruct.count": 3, "item.x": null}"#,
        )
        .unwrap();
        assert_eq!(lang.len(), 1);
        assert_eq!(lang.skipped, 2);
        assert_eq!(lang.get("block.tconstruct.seared_stone"), Some("Seared Stone"));
    }

    #[test]
    fn json_lang_with_comments_and_trailing_commas() {
        let content = "\u{feff}{\n  // blocks\n  \"block.a\": \"A // not a comment\",\n  /* items\n */ \"item.b\": \"B, }\",\n}\n";
        let lang = parse_json_lang(content).unwrap();
        assert_eq!(lang.get("block.a"), Some("A // not a comment"));
        assert_eq!(lang.get("item.b"), Some("B, }"));
    }

    #[test]
    fn json_lang_escaped_quotes_survive_stripping() {
        let content = r#"{"a": "say \"hi\" // there", /* c */ "b": "x",}"#;
        let lang = parse_json_lang(content).unwrap();
        assert_eq!(lang.get("a"), Some(r#"say "hi" // there"#));
        assert_eq!(lang.get("b"), Some("x"));
    }

    #[test]
    fn json_lang_rejects_arrays() {
        assert!(parse_json_lang("[\"a\"]").is_err());
        assert!(parse_json_lang("{not json").is_err());
    }

    #[test]
    fn legacy_lang_lines() {
        let content = "# comment\n\ntile.stone.name=Stone\nitem.empty=\n=orphan\nno separator\nitem.eq=a=b\n";
        let lang = parse_legacy_lang(content);
        assert_eq!(lang.len(), 2);
        assert_eq!(lang.skipped, 2);
        assert_eq!(lang.get("tile.stone.name"), Some("Stone"));
        assert_eq!(lang.get("item.eq"), Some("a=b"));
    }

    #[test]
    fn prefix_filter_in_key_order() {
        let lang = parse_json_lang(r#"{"item.b": "B", "block.a": "A", "item.a": "A2"}"#).unwrap();
        let keys: Vec<&str> = lang.with_prefix("item.").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["item.a", "item.b"]);
    }

    #[test]
    fn read_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("en_us.json");
        let legacy = dir.path().join("en_US.lang");
        std::fs::write(&json, r#"{"item.a": "A"}"#).unwrap();
        std::fs::write(&legacy, "item.a=A\n").unwrap();
        assert_eq!(read_lang_file(&json).unwrap(), read_lang_file(&legacy).unwrap());

        let err = read_lang_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.contains("missing.json"));
    }
}

// YAML and JSON document output

use std::path::Path;

use serde::Serialize;

/// Create the parent directory of `path` when missing.
pub fn ensure_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))
        }
        _ => Ok(()),
    }
}

/// Serialize `doc` in field order, preceded by `# ` comment lines and a blank line.
pub fn to_yaml_string<T: Serialize>(doc: &T, header: &[String]) -> Result<String, String> {
    let body = serde_yaml::to_string(doc).map_err(|e| e.to_string())?;
    if header.is_empty() {
        return Ok(body);
    }

    let mut out = String::new();
    for line in header {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&body);
    Ok(out)
}

pub fn write_yaml<T: Serialize>(path: &Path, doc: &T, header: &[String]) -> Result<(), String> {
    let text = to_yaml_string(doc, header)?;
    ensure_parent(path)?;
    std::fs::write(path, text).map_err(|e| format!("{}: {e}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Pretty JSON with a trailing newline. Non-ASCII text is written as-is.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    text.push('\n');
    ensure_parent(path)?;
    std::fs::write(path, text).map_err(|e| format!("{}: {e}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

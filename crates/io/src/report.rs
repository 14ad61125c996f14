// Plain-text reports

use std::fmt::Write as _;
use std::path::Path;

use moddict_recon::unmatched::UnmatchedEntry;

/// Keep one entry per line: tabs and line breaks inside a field are written as `\t`, `\n`.
fn escape_field(field: &str) -> String {
    field.replace('\\', "\\\\").replace('\t', "\\t").replace('\r', "\\r").replace('\n', "\\n")
}

/// `key\tsource\ttarget` lines.
pub fn unmatched_list(entries: &[UnmatchedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            escape_field(&entry.key),
            escape_field(&entry.source),
            escape_field(&entry.target)
        );
    }
    out
}

pub fn write_unmatched_list(path: &Path, entries: &[UnmatchedEntry]) -> Result<(), String> {
    crate::yaml::ensure_parent(path)?;
    std::fs::write(path, unmatched_list(entries)).map_err(|e| format!("{}: {e}", path.display()))
}

// CSV import/export of translation rows (`key,source_text,target_text`)

use std::io::{Read, Write};
use std::path::Path;

use moddict_recon::{load_incoming_rows, IncomingRow};

pub const HEADER: [&str; 3] = ["key", "source_text", "target_text"];

/// Read file and convert to UTF-8 if needed (handles Windows-1252 exports).
/// A leading byte-order mark is removed.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| format!("{}: {e}", path.display()))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("{} is not valid UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Load incoming translation rows from a CSV export.
pub fn read_translation_rows(path: &Path) -> Result<Vec<IncomingRow>, String> {
    let content = read_file_as_utf8(path)?;
    let rows = load_incoming_rows(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    log::debug!("{}: {} rows", path.display(), rows.len());
    Ok(rows)
}

/// Write rows with a header line. `bom` prefixes the output with a UTF-8 byte-order mark.
pub fn write_translation_rows<W: Write>(mut out: W, rows: &[IncomingRow], bom: bool) -> Result<(), String> {
    if bom {
        out.write_all("\u{feff}".as_bytes()).map_err(|e| e.to_string())?;
    }

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER).map_err(|e| e.to_string())?;
    for row in rows {
        writer
            .write_record([&row.key, &row.source_text, &row.target_text])
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// Export rows to `path`, BOM-prefixed so spreadsheet tools pick up UTF-8.
pub fn export(rows: &[IncomingRow], path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    write_translation_rows(std::io::BufWriter::new(file), rows, true)
}

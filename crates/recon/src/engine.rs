use crate::error::ReconError;
use crate::model::{
    IncomingRow, IncomingSet, ReconBucket, ReconPlan, ReconSummary, RecordUpdate, Status,
    TranslationRecord,
};

/// Decide the bucket for one existing record.
pub fn classify<'a>(record: &TranslationRecord, incoming: &'a IncomingSet) -> (ReconBucket, Option<&'a str>) {
    let Some(new_target) = incoming.get(&record.record_key()) else {
        return (ReconBucket::Unmatched, None);
    };

    if record.status.is_protected() {
        return (ReconBucket::SkippedOfficial, None);
    }

    if record.target_text == new_target {
        return (ReconBucket::SkippedUnchanged, None);
    }

    (ReconBucket::Updated, Some(new_target))
}

/// Compute the updates without touching `existing`. Updates come out in visit order.
pub fn plan(existing: &[TranslationRecord], incoming: &IncomingSet) -> ReconPlan {
    let mut summary = ReconSummary::default();
    let mut updates = Vec::new();

    for record in existing {
        let (bucket, new_target) = classify(record, incoming);
        summary.record(bucket);
        if let Some(target) = new_target {
            updates.push(RecordUpdate {
                id: record.id,
                key: record.key.clone(),
                target_text: target.to_string(),
            });
        }
    }

    log::debug!(
        "recon plan: {} records, {} updates, {} official, {} unchanged, {} unmatched",
        summary.total(),
        summary.updated,
        summary.skipped_official,
        summary.skipped_unchanged,
        summary.unmatched
    );

    ReconPlan { summary, updates }
}

/// Reconcile in memory: matched, non-official, changed records take the
/// incoming target and become `translated`.
pub fn reconcile(existing: &mut [TranslationRecord], incoming: &IncomingSet) -> ReconSummary {
    let mut summary = ReconSummary::default();

    for record in existing.iter_mut() {
        let (bucket, new_target) = classify(record, incoming);
        summary.record(bucket);
        if let Some(target) = new_target {
            record.target_text = target.to_string();
            record.status = Status::Translated;
        }
    }

    summary
}

/// Load `key, source_text, target_text` rows from CSV text.
///
/// A leading byte-order mark is ignored, fields are trimmed, extra columns
/// are ignored and short rows read their missing cells as empty.
pub fn load_incoming_rows(csv_data: &str) -> Result<Vec<IncomingRow>, ReconError> {
    let data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn { column: name.into() })
    };

    let key_idx = idx("key")?;
    let source_idx = idx("source_text")?;
    let target_idx = idx("target_text")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;
        rows.push(IncomingRow {
            key: record.get(key_idx).unwrap_or("").to_string(),
            source_text: record.get(source_idx).unwrap_or("").to_string(),
            target_text: record.get(target_idx).unwrap_or("").to_string(),
        });
    }

    Ok(rows)
}

/// Parse CSV text straight into an [`IncomingSet`].
pub fn load_incoming(csv_data: &str) -> Result<IncomingSet, ReconError> {
    let rows = load_incoming_rows(csv_data)?;
    Ok(IncomingSet::from_rows(&rows))
}

use std::collections::HashSet;
use std::path::PathBuf;

use moddict_recon::engine::{load_incoming, load_incoming_rows, plan, reconcile};
use moddict_recon::model::{IncomingSet, RecordKey, Status, TranslationRecord};
use moddict_recon::unmatched::find_unmatched;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Store snapshot: `id,key,source_text,target_text,status`.
fn load_existing() -> Vec<TranslationRecord> {
    let data = read_fixture("existing.csv");
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            TranslationRecord {
                id: r[0].parse().unwrap(),
                key: r[1].to_string(),
                source_text: r[2].to_string(),
                target_text: r[3].to_string(),
                status: r[4].parse().unwrap(),
            }
        })
        .collect()
}

// -------------------------------------------------------------------------
// Restore
// -------------------------------------------------------------------------

#[test]
fn restore_from_export() {
    let incoming = load_incoming(&read_fixture("all_mods_ja_jp.csv")).unwrap();
    assert_eq!(incoming.rows_read, 9);
    assert_eq!(incoming.rows_rejected, 2);
    assert_eq!(incoming.len(), 7);

    let mut existing = load_existing();
    let summary = reconcile(&mut existing, &incoming);

    assert_eq!(summary.updated, 3);
    assert_eq!(summary.skipped_official, 1);
    assert_eq!(summary.skipped_unchanged, 1);
    assert_eq!(summary.unmatched, 3);
    assert_eq!(summary.total(), existing.len());

    let by_id = |id: i64| existing.iter().find(|r| r.id == id).unwrap();
    assert_eq!(by_id(2).target_text, "焼成レンガ");
    assert_eq!(by_id(4).target_text, "血のオーブ");
    assert_eq!(by_id(4).status, Status::Translated);
    assert_eq!(by_id(5).target_text, "シジル（新）");
    // official untouched
    assert_eq!(by_id(3).target_text, "型紙");
    assert_eq!(by_id(3).status, Status::Official);
    // rejected CSV row (empty target) leaves the record alone
    assert_eq!(by_id(6).target_text, "コバルト");
}

#[test]
fn restore_twice_is_idempotent() {
    let incoming = load_incoming(&read_fixture("all_mods_ja_jp.csv")).unwrap();
    let mut existing = load_existing();

    let first = reconcile(&mut existing, &incoming);
    let second = reconcile(&mut existing, &incoming);

    assert_eq!(second.updated, 0);
    assert_eq!(second.skipped_unchanged, first.updated + first.skipped_unchanged);
    assert_eq!(second.skipped_official, first.skipped_official);
    assert_eq!(second.unmatched, first.unmatched);
}

#[test]
fn plan_matches_reconcile() {
    let incoming = load_incoming(&read_fixture("all_mods_ja_jp.csv")).unwrap();
    let existing = load_existing();

    let p = plan(&existing, &incoming);
    let mut applied = existing.clone();
    let summary = reconcile(&mut applied, &incoming);

    assert_eq!(p.summary, summary);
    assert_eq!(p.updates.len(), summary.updated);
    for update in &p.updates {
        let rec = applied.iter().find(|r| r.id == update.id).unwrap();
        assert_eq!(rec.target_text, update.target_text);
    }
}

#[test]
fn official_records_survive_any_input() {
    let existing = load_existing();
    let officials: Vec<TranslationRecord> =
        existing.iter().filter(|r| r.status == Status::Official).cloned().collect();
    assert!(!officials.is_empty());

    // Every record gets a fresh value.
    let incoming: IncomingSet = existing
        .iter()
        .map(|r| (r.record_key(), format!("{}!", r.target_text)))
        .collect();

    let mut after = existing.clone();
    reconcile(&mut after, &incoming);
    for official in &officials {
        let rec = after.iter().find(|r| r.id == official.id).unwrap();
        assert_eq!(rec, official);
    }
}

// -------------------------------------------------------------------------
// Unmatched
// -------------------------------------------------------------------------

#[test]
fn unmatched_rows_against_store_sources() {
    let rows = load_incoming_rows(&read_fixture("all_mods_ja_jp.csv")).unwrap();
    let sources: HashSet<RecordKey> = load_existing().iter().map(|r| r.record_key()).collect();

    let report = find_unmatched(&sources, &rows);
    assert_eq!(report.csv_total, 9);
    assert_eq!(report.matched, 6);
    assert_eq!(report.unmatched(), 3);

    let prefixes: Vec<&str> = report.prefixes.iter().map(|p| p.prefix.as_str()).collect();
    assert_eq!(prefixes, vec!["", "gui", "tooltip"]);
    assert!(report.entries.iter().any(|e| e.key == "gui.mekanism.energy"));
}

#[test]
fn summary_serializes_bucket_names() {
    let incoming = load_incoming(&read_fixture("all_mods_ja_jp.csv")).unwrap();
    let summary = plan(&load_existing(), &incoming).summary;
    let value = serde_json::to_value(summary).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "updated": 3,
            "skipped_official": 1,
            "skipped_unchanged": 1,
            "unmatched": 3,
        })
    );
}

//! `moddict import`, `export`, `restore`, `unmatched`: the SQLite translation store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use moddict_io::csv::{export, read_translation_rows};
use moddict_io::report::write_unmatched_list;
use moddict_io::{ImportStats, TranslationStore};
use moddict_recon::unmatched::{find_unmatched, UnmatchedEntry};
use moddict_recon::{plan, IncomingSet, ReconSummary};

use crate::translate::read_lang;
use crate::{print_json, require_file, CliError, Context};

/// Key-prefix lines shown in the unmatched summary.
const PREFIX_LINES: usize = 20;

#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// SQLite store (default: database.path from settings)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Target language (default: database.target_lang from settings)
    #[arg(long)]
    pub target_lang: Option<String>,
}

impl StoreArgs {
    fn db_path(&self, ctx: &Context) -> PathBuf {
        self.db.clone().unwrap_or_else(|| ctx.settings.database.path.clone())
    }

    fn target_lang<'a>(&'a self, ctx: &'a Context) -> &'a str {
        self.target_lang.as_deref().unwrap_or(&ctx.settings.database.target_lang)
    }

    /// Open an existing store. Only `import` creates one.
    fn open_existing(&self, ctx: &Context) -> Result<TranslationStore, CliError> {
        let path = self.db_path(ctx);
        if !path.is_file() {
            return Err(CliError::io(format!("{}: no such store", path.display()))
                .with_hint("create it with: moddict import <LANG> --db <FILE>"));
        }
        TranslationStore::open(&path).map_err(CliError::store)
    }
}

/// `status: draft 3, official 1` for the summary line.
fn status_line(counts: &BTreeMap<String, usize>) -> String {
    let parts: Vec<String> = counts.iter().map(|(status, n)| format!("{status} {n}")).collect();
    format!("status: {}", if parts.is_empty() { "empty".to_string() } else { parts.join(", ") })
}

fn status_counts(store: &TranslationStore, target_lang: &str) -> Result<BTreeMap<String, usize>, CliError> {
    store.count_by_status(target_lang).map_err(CliError::store)
}

// ============================================================================
// import
// ============================================================================

#[derive(Serialize)]
struct ImportSummary {
    #[serde(flatten)]
    stats: ImportStats,
    status: BTreeMap<String, usize>,
}

pub fn cmd_import(
    ctx: &Context,
    lang_path: &Path,
    official: Option<&Path>,
    store_args: &StoreArgs,
    json: bool,
) -> Result<(), CliError> {
    let source = read_lang(lang_path)?;
    let official = official.map(read_lang).transpose()?;
    let target_lang = store_args.target_lang(ctx);

    let db_path = store_args.db_path(ctx);
    let mut store = TranslationStore::open(&db_path).map_err(CliError::store)?;
    let stats = store
        .import_lang(&source, official.as_ref(), target_lang)
        .map_err(CliError::store)?;

    ctx.note(format!(
        "imported {}: {} entries, {} new sources, {} new {target_lang} translations, {} promoted to official",
        lang_path.display(),
        stats.entries,
        stats.sources_added,
        stats.translations_added,
        stats.promoted_official
    ));
    let status = status_counts(&store, target_lang)?;
    ctx.note(status_line(&status));

    if json {
        print_json(&ImportSummary { stats, status })?;
    }
    Ok(())
}

// ============================================================================
// export
// ============================================================================

pub fn cmd_export(ctx: &Context, store_args: &StoreArgs, output: &Path) -> Result<(), CliError> {
    let store = store_args.open_existing(ctx)?;
    let target_lang = store_args.target_lang(ctx);
    let rows = store.export_rows(target_lang).map_err(CliError::store)?;

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| CliError::io(format!("{}: {e}", dir.display())))?;
    }
    export(&rows, output).map_err(CliError::io)?;

    ctx.note(format!("exported {} {target_lang} rows -> {}", rows.len(), output.display()));
    Ok(())
}

// ============================================================================
// restore
// ============================================================================

#[derive(Serialize)]
struct RestoreSummary {
    csv_rows: usize,
    accepted: usize,
    rejected: usize,
    duplicates: usize,
    #[serde(flatten)]
    recon: ReconSummary,
    written: usize,
    dry_run: bool,
    /// Store state after the restore.
    status: BTreeMap<String, usize>,
}

pub fn cmd_restore(
    ctx: &Context,
    csv_path: &Path,
    store_args: &StoreArgs,
    dry_run: bool,
    json: bool,
) -> Result<(), CliError> {
    require_file(csv_path)?;
    let rows = read_translation_rows(csv_path).map_err(CliError::parse)?;
    let incoming = IncomingSet::from_rows(&rows);
    if incoming.rows_rejected > 0 {
        log::warn!("{} CSV rows without key or target_text ignored", incoming.rows_rejected);
    }
    if incoming.duplicate_keys > 0 {
        log::warn!("{} repeated (key, source_text) rows, last one kept", incoming.duplicate_keys);
    }

    let mut store = store_args.open_existing(ctx)?;
    let target_lang = store_args.target_lang(ctx);
    let records = store.load_records(target_lang).map_err(CliError::store)?;
    let p = plan(&records, &incoming);

    let written = if dry_run {
        0
    } else {
        store
            .apply_updates(&p.updates, ctx.settings.database.commit_every)
            .map_err(CliError::store)?
    };

    let s = p.summary;
    ctx.note(format!(
        "{} CSV rows ({} usable) against {} {target_lang} records",
        incoming.rows_read,
        incoming.len(),
        records.len()
    ));
    ctx.note(format!(
        "{}updated: {}, skipped (official): {}, skipped (unchanged): {}, not in CSV: {}",
        if dry_run { "[dry run] " } else { "" },
        s.updated,
        s.skipped_official,
        s.skipped_unchanged,
        s.unmatched
    ));
    let status = status_counts(&store, target_lang)?;
    ctx.note(status_line(&status));

    if json {
        print_json(&RestoreSummary {
            csv_rows: incoming.rows_read,
            accepted: incoming.len(),
            rejected: incoming.rows_rejected,
            duplicates: incoming.duplicate_keys,
            recon: s,
            written,
            dry_run,
            status,
        })?;
    }
    Ok(())
}

// ============================================================================
// unmatched
// ============================================================================

#[derive(Serialize)]
struct UnmatchedSummary<'a> {
    csv_total: usize,
    matched: usize,
    unmatched: usize,
    prefixes: &'a [moddict_recon::unmatched::PrefixCount],
    sample: &'a [UnmatchedEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
}

pub fn cmd_unmatched(
    ctx: &Context,
    csv_path: &Path,
    store_args: &StoreArgs,
    output: Option<&Path>,
    sample: usize,
    json: bool,
) -> Result<(), CliError> {
    require_file(csv_path)?;
    let rows = read_translation_rows(csv_path).map_err(CliError::parse)?;
    let store = store_args.open_existing(ctx)?;
    let sources = store.source_keys().map_err(CliError::store)?;
    log::info!("{} sources in store", sources.len());

    let report = find_unmatched(&sources, &rows);
    let shown = &report.entries[..sample.min(report.entries.len())];

    ctx.note(format!(
        "CSV total: {}, matched: {}, unmatched: {}",
        report.csv_total,
        report.matched,
        report.unmatched()
    ));
    if !report.entries.is_empty() && !ctx.quiet {
        eprintln!("\nkey prefix distribution:");
        for p in report.prefixes.iter().take(PREFIX_LINES) {
            eprintln!("  {}: {}", p.prefix, p.count);
        }
        if !shown.is_empty() {
            eprintln!("\nsample entries:");
            for e in shown {
                eprintln!("  key:    {}", e.key);
                eprintln!("  source: {}", e.source);
                eprintln!("  target: {}", e.target);
                eprintln!();
            }
        }
    }

    if let Some(path) = output {
        write_unmatched_list(path, &report.entries).map_err(CliError::io)?;
        ctx.note(format!("full list -> {}", path.display()));
    }

    if json {
        print_json(&UnmatchedSummary {
            csv_total: report.csv_total,
            matched: report.matched,
            unmatched: report.unmatched(),
            prefixes: &report.prefixes,
            sample: shown,
            output,
        })?;
    }
    Ok(())
}

//! `moddict translate`, `bilingual`, `modules`, `book`: document generation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use moddict_config::{BookFormat, ModProfile};
use moddict_io::documents::{
    build_bilingual_document, build_category_document, build_final_document, EntryTranslator,
    IntegratedDocument, ModuleSection, Statistics, DEFAULT_VERSION,
};
use moddict_io::patchouli::{self, category_path, BookDocument, DumpEntry};
use moddict_io::yaml::{ensure_parent, write_json, write_yaml};
use moddict_io::{mantle, read_lang_file, LangFile, ModMeta};
use moddict_terms::{Substituter, SubstitutionMode, TermDictionary};

use crate::{print_json, require_file, CliError, Context};

pub fn read_lang(path: &Path) -> Result<LangFile, CliError> {
    require_file(path)?;
    read_lang_file(path).map_err(CliError::parse)
}

fn load_profile(path: &Path) -> Result<ModProfile, CliError> {
    ModProfile::load(path).map_err(CliError::config)
}

/// Merge `paths` in order and prepare them for `mode`.
pub fn load_substituter(paths: &[PathBuf], mode: SubstitutionMode) -> Result<Substituter, CliError> {
    let dictionary = TermDictionary::load_all(paths).map_err(CliError::dictionary)?;
    if dictionary.is_empty() {
        log::warn!("dictionaries contain no terms; every entry will be marked untranslated");
    }
    log::info!("{} terms from {} dictionaries, {mode} mode", dictionary.len(), paths.len());
    Substituter::new(&dictionary, mode).map_err(CliError::dictionary)
}

/// Curated translations: override files in order, then the profile's own table.
fn load_overrides(profile: &ModProfile) -> Result<BTreeMap<String, String>, CliError> {
    let mut overrides = BTreeMap::new();
    for path in &profile.override_files {
        let file = read_lang(path)?;
        log::info!("{} overrides from {}", file.len(), path.display());
        overrides.extend(file.entries.into_iter().filter(|(_, target)| !target.is_empty()));
    }
    overrides.extend(profile.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(overrides)
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    ensure_parent(path).map_err(CliError::io)?;
    std::fs::write(path, text).map_err(|e| CliError::io(format!("{}: {e}", path.display())))
}

fn profile_meta(profile: &ModProfile) -> ModMeta {
    ModMeta {
        mod_id: profile.mod_id.clone(),
        version: profile.version.clone(),
        mc_version: profile.mc_version.clone(),
    }
}

// ============================================================================
// translate
// ============================================================================

#[derive(Serialize)]
struct CategoryOutcome {
    name: String,
    prefix: String,
    file: PathBuf,
    total_entries: usize,
    written: usize,
    translated: usize,
    verified: usize,
}

#[derive(Serialize)]
struct TranslateSummary {
    mod_id: String,
    mode: SubstitutionMode,
    source_entries: usize,
    categories: Vec<CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_document: Option<PathBuf>,
}

pub fn cmd_translate(
    ctx: &Context,
    lang_path: &Path,
    profile_path: &Path,
    out_dir: Option<PathBuf>,
    final_path: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let profile = load_profile(profile_path)?;
    if profile.categories.is_empty() {
        return Err(CliError::args(format!("{}: no categories to translate", profile_path.display()))
            .with_hint("add [[categories]] entries with a prefix and a name"));
    }

    let lang = read_lang(lang_path)?;
    let mode = profile.effective_mode(ctx.settings.translate.mode);
    let substituter = load_substituter(&profile.dictionaries, mode)?;
    let out_dir = out_dir.unwrap_or_else(|| ctx.settings.output.dir.clone());
    let meta = profile_meta(&profile);
    let overrides = load_overrides(&profile)?;
    let translator = EntryTranslator {
        substituter: &substituter,
        overrides: &overrides,
        marker: &ctx.settings.translate.untranslated_marker,
    };

    let mut summary = TranslateSummary {
        mod_id: profile.mod_id.clone(),
        mode,
        source_entries: lang.len(),
        categories: Vec::new(),
        final_document: None,
    };
    let mut docs = Vec::with_capacity(profile.categories.len());

    for category in &profile.categories {
        let doc = build_category_document(&lang, &meta, &category.name, &category.prefix, &translator, profile.limit);
        if doc.total_entries == 0 {
            log::warn!("category {}: no keys start with {}", category.name, category.prefix);
        }

        let file = out_dir.join(format!("{}_translation.yaml", category.name));
        let header = vec![
            format!(
                "{} - {}",
                profile.display_name(),
                category.title.as_deref().unwrap_or(&category.name)
            ),
            format!(
                "{} entries, {} curated, {} changed by the dictionary",
                doc.total_entries, doc.verified, doc.translated
            ),
        ];
        write_yaml(&file, &doc, &header).map_err(CliError::io)?;

        ctx.note(format!(
            "{}: {} entries, {} translated -> {}",
            category.name,
            doc.total_entries,
            doc.translated,
            file.display()
        ));
        summary.categories.push(CategoryOutcome {
            name: category.name.clone(),
            prefix: category.prefix.clone(),
            file,
            total_entries: doc.total_entries,
            written: doc.translations.len(),
            translated: doc.translated,
            verified: doc.verified,
        });
        docs.push(doc);
    }

    if let Some(path) = final_path {
        let date = profile.translation_date.clone().unwrap_or_else(today);
        let doc = build_final_document(&meta, profile.display_name(), &date, lang.len(), &docs);
        let header = vec![format!("{} - final translation ({date})", profile.display_name())];
        write_yaml(path, &doc, &header).map_err(CliError::io)?;
        ctx.note(format!(
            "final: {} keys, {} verified -> {}",
            doc.stats.total_keys,
            doc.stats.verified_translations,
            path.display()
        ));
        summary.final_document = Some(path.to_path_buf());
    }

    if json {
        print_json(&summary)?;
    }
    Ok(())
}

// ============================================================================
// bilingual
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_bilingual(
    ctx: &Context,
    en_path: &Path,
    ja_path: &Path,
    module: &str,
    mod_id: Option<String>,
    version: Option<String>,
    output: &Path,
    json: bool,
) -> Result<(), CliError> {
    let en = read_lang(en_path)?;
    let ja = read_lang(ja_path)?;
    let meta = ModMeta {
        mod_id: mod_id.unwrap_or_default(),
        version: version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        mc_version: String::new(),
    };

    let doc = build_bilingual_document(&en, &ja, module, &meta);
    write_yaml(output, &doc, &[]).map_err(CliError::io)?;

    let stats = &doc.statistics;
    ctx.note(format!(
        "{module}: {} entries, {} translated ({}) -> {}",
        stats.total_entries,
        stats.translated_entries,
        stats.translation_rate,
        output.display()
    ));

    if json {
        print_json(stats)?;
    }
    Ok(())
}

// ============================================================================
// modules
// ============================================================================

#[derive(Serialize)]
struct ModuleOutcome {
    id: String,
    file: PathBuf,
    #[serde(flatten)]
    statistics: Statistics,
}

#[derive(Serialize)]
struct ModulesSummary {
    mod_id: String,
    modules: Vec<ModuleOutcome>,
    skipped: Vec<String>,
    total: Statistics,
    output: PathBuf,
}

pub fn cmd_modules(ctx: &Context, profile_path: &Path, out_dir: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let profile = load_profile(profile_path)?;
    if profile.modules.is_empty() {
        return Err(CliError::args(format!("{}: no modules", profile_path.display()))
            .with_hint("add [[modules]] entries with id, name, en and ja"));
    }
    let out_dir = out_dir.unwrap_or_else(|| ctx.settings.output.dir.clone());

    let mut integrated = IntegratedDocument {
        mod_id: profile.mod_id.clone(),
        mod_name: profile.display_name().to_string(),
        minecraft_version: profile.mc_version.clone(),
        modules: Vec::new(),
    };
    let mut outcomes = Vec::new();
    let mut skipped = Vec::new();

    for module in &profile.modules {
        if let Some(missing) = [&module.en, &module.ja].into_iter().find(|p| !p.is_file()) {
            log::warn!("{}: {} not found, skipping", module.id, missing.display());
            skipped.push(module.id.clone());
            continue;
        }
        let en = read_lang(&module.en)?;
        let ja = read_lang(&module.ja)?;
        let version = match profile.module_version(module) {
            "" => DEFAULT_VERSION,
            v => v,
        };
        let meta = ModMeta {
            mod_id: String::new(),
            version: version.to_string(),
            mc_version: String::new(),
        };
        let doc = build_bilingual_document(&en, &ja, &module.name, &meta);

        let file = out_dir.join(format!("{}_{}_translations.yaml", profile.mod_id, module.id));
        write_yaml(&file, &doc, &[]).map_err(CliError::io)?;
        ctx.note(format!(
            "{}: {} entries, {} translated ({}) -> {}",
            module.name,
            doc.statistics.total_entries,
            doc.statistics.translated_entries,
            doc.statistics.translation_rate,
            file.display()
        ));

        outcomes.push(ModuleOutcome {
            id: module.id.clone(),
            file,
            statistics: doc.statistics.clone(),
        });
        integrated.modules.push(ModuleSection::from_document(&module.id, doc));
    }

    let output = out_dir.join(format!("{}_all_translations.yaml", profile.mod_id));
    write_yaml(&output, &integrated, &[]).map_err(CliError::io)?;

    let total = integrated.statistics();
    ctx.note(format!(
        "{} modules, {} entries, {} translated ({}) -> {}",
        integrated.modules.len(),
        total.total_entries,
        total.translated_entries,
        total.translation_rate,
        output.display()
    ));

    if json {
        print_json(&ModulesSummary {
            mod_id: profile.mod_id.clone(),
            modules: outcomes,
            skipped,
            total,
            output,
        })?;
    }
    Ok(())
}

// ============================================================================
// book
// ============================================================================

/// Options of `moddict book` beyond the profile.
pub struct BookArgs<'a> {
    pub entries: &'a [PathBuf],
    pub profile: &'a Path,
    pub output: &'a Path,
    pub format: Option<BookFormat>,
    pub root: Option<&'a Path>,
    pub json_dump: Option<&'a Path>,
    pub summary: Option<&'a Path>,
    pub apply_dir: Option<&'a Path>,
}

pub fn cmd_book(ctx: &Context, args: BookArgs<'_>) -> Result<(), CliError> {
    let profile = load_profile(args.profile)?;
    let mode = profile.effective_mode(ctx.settings.translate.mode);
    let substituter = load_substituter(&profile.dictionaries, mode)?;
    for path in args.entries {
        require_file(path)?;
    }

    let book = profile.book.clone().unwrap_or_default();
    let format = args.format.unwrap_or(book.format);
    let date = profile.book_date().map(str::to_string).unwrap_or_else(today);
    let title = format!(
        "{} - {format} entries: {}",
        profile.display_name(),
        book.title.as_deref().unwrap_or(&book.category)
    );
    let target_lang = &ctx.settings.database.target_lang;

    let total = match format {
        BookFormat::Patchouli => {
            if args.apply_dir.is_some() {
                return Err(CliError::args("--apply-dir is only supported for mantle books"));
            }
            let mut entries = Vec::with_capacity(args.entries.len());
            for path in args.entries {
                let entry = patchouli::read_entry(path, &substituter).map_err(CliError::parse)?;
                log::debug!("{}: {} pages", entry.file, entry.page_count);
                entries.push(entry);
            }

            if let Some(path) = args.json_dump {
                let paths: Vec<String> = args.entries.iter().map(|p| category_path(args.root, p)).collect();
                let dump: Vec<DumpEntry<'_>> = entries
                    .iter()
                    .zip(&paths)
                    .map(|(entry, path)| DumpEntry { entry, category_path: path.as_str() })
                    .collect();
                write_json(path, &dump).map_err(CliError::io)?;
                ctx.note(format!("wrote {}", path.display()));
            }
            if let Some(path) = args.summary {
                write_text(path, &patchouli::translation_summary(&entries))?;
                ctx.note(format!("wrote {}", path.display()));
            }

            let doc = BookDocument::new(&profile.mod_id, &profile.mc_version, &book.category, &date, target_lang, entries);
            let header = vec![title, format!("{} entries", doc.total_entries)];
            write_yaml(args.output, &doc, &header).map_err(CliError::io)?;
            doc.total_entries
        }
        BookFormat::Mantle => {
            let mut pages = Vec::with_capacity(args.entries.len());
            for path in args.entries {
                let page = mantle::read_page(path, &substituter).map_err(CliError::parse)?;
                log::debug!("{}: {} fields", page.file, page.field_count);
                pages.push(page);
            }

            if let Some(dir) = args.apply_dir {
                for page in &pages {
                    write_json(&dir.join(&page.file), &page.translated).map_err(CliError::io)?;
                }
                ctx.note(format!("{} translated pages -> {}", pages.len(), dir.display()));
            }
            if let Some(path) = args.json_dump {
                write_json(path, &pages).map_err(CliError::io)?;
                ctx.note(format!("wrote {}", path.display()));
            }
            if let Some(path) = args.summary {
                write_text(path, &mantle::translation_summary(&pages))?;
                ctx.note(format!("wrote {}", path.display()));
            }

            let doc = BookDocument::new(&profile.mod_id, &profile.mc_version, &book.category, &date, target_lang, pages);
            let header = vec![title, format!("{} pages", doc.total_entries)];
            write_yaml(args.output, &doc, &header).map_err(CliError::io)?;
            doc.total_entries
        }
    };

    ctx.note(format!("{total} entries -> {}", args.output.display()));
    Ok(())
}

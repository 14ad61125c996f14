// moddict CLI - Japanese localization datasets for Minecraft mods

mod db;
mod dict;
mod exit_codes;
mod translate;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use moddict_config::{BookFormat, ConfigError, Settings};
use moddict_terms::TermError;

use exit_codes::{
    config_exit_code, term_exit_code, EXIT_FORMAT, EXIT_IO, EXIT_PARSE, EXIT_STORE, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "moddict")]
#[command(about = "Build Japanese localization data for Minecraft mods")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Settings file (default: ./moddict.toml, then the user config directory)
    #[arg(long, global = true, env = "MODDICT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Errors only: no summaries on stderr
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a mod profile's dictionaries and write one YAML document per category
    #[command(after_help = "\
Examples:
  moddict translate en_us.json --profile profiles/tconstruct.toml
  moddict translate en_us.json --profile profiles/tconstruct.toml --out-dir out/ --json
  moddict translate en_us.json -p tconstruct.toml --final tconstruct_translation_final.yaml

Keys listed under [overrides] (or in override_files) take the curated
translation and are written with status: verified.")]
    Translate {
        /// Source language file (JSON or legacy .lang)
        lang: PathBuf,

        /// Mod profile (TOML)
        #[arg(long, short = 'p')]
        profile: PathBuf,

        /// Output directory (default: output.dir from settings)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write every category into one document with key statistics
        #[arg(long = "final", value_name = "FILE")]
        final_document: Option<PathBuf>,

        /// Print the machine summary to stdout
        #[arg(long)]
        json: bool,
    },

    /// Pair English and Japanese language files into a bilingual YAML document
    #[command(after_help = "\
Examples:
  moddict bilingual core_en_us.json core_ja_jp.json --module 'Mekanism Core' -o mekanism_core.yaml
  moddict bilingual en_us.json ja_jp.json --module Tools --mod-id mekanism --version 10.4.x -o tools.yaml")]
    Bilingual {
        /// English language file
        en: PathBuf,

        /// Japanese language file
        ja: PathBuf,

        /// Module name written to the document
        #[arg(long)]
        module: String,

        #[arg(long)]
        mod_id: Option<String>,

        /// Module version (default: 10.4.x)
        #[arg(long)]
        version: Option<String>,

        /// Output YAML file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Print the statistics to stdout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bilingual documents for every [[modules]] entry of a profile, plus one integrated document
    #[command(after_help = "\
Examples:
  moddict modules --profile profiles/mekanism.toml --out-dir output/

Modules whose language files are missing are skipped with a warning.")]
    Modules {
        /// Mod profile (TOML) with [[modules]] entries
        #[arg(long, short = 'p')]
        profile: PathBuf,

        /// Output directory (default: output.dir from settings)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Translate Patchouli book entries or Mantle book pages
    #[command(after_help = "\
Examples:
  moddict book alchemy_table.json potions.json --profile profiles/bloodmagic.toml -o alchemy_table.yaml
  moddict book book/**/*.json -p bloodmagic.toml -o book.yaml --root book/ --json-dump translated_data.json
  moddict book smeltery/*.json -p tconstruct.toml --format mantle -o smeltery.yaml --apply-dir ja_jp/")]
    Book {
        /// Entry files, in output order
        #[arg(required = true)]
        entries: Vec<PathBuf>,

        /// Mod profile (TOML)
        #[arg(long, short = 'p')]
        profile: PathBuf,

        /// Output YAML file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Book format (default: book.format from the profile, else patchouli)
        #[arg(long, value_parser = parse_book_format)]
        format: Option<BookFormat>,

        /// Book directory; entry subdirectories become their category path
        #[arg(long)]
        root: Option<PathBuf>,

        /// Also write the translated entries as JSON
        #[arg(long)]
        json_dump: Option<PathBuf>,

        /// Also write a plain-text overview of the entries
        #[arg(long, value_name = "TXT")]
        summary: Option<PathBuf>,

        /// Write translated copies of Mantle pages into this directory
        #[arg(long, value_name = "DIR")]
        apply_dir: Option<PathBuf>,
    },

    /// Add a language file's entries to the store
    #[command(after_help = "\
Examples:
  moddict import en_us.json
  moddict import en_us.json --official ja_jp.json --db moddict.db")]
    Import {
        /// Source language file (JSON or legacy .lang)
        lang: PathBuf,

        /// The mod's own target-language file; its values are stored as official
        #[arg(long)]
        official: Option<PathBuf>,

        #[command(flatten)]
        store: db::StoreArgs,

        #[arg(long)]
        json: bool,
    },

    /// Export the store as key,source_text,target_text CSV
    #[command(after_help = "\
Examples:
  moddict export -o exports/all_mods_ja_jp.csv")]
    Export {
        #[command(flatten)]
        store: db::StoreArgs,

        /// Output CSV file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Restore translations from a CSV export (official entries are never overwritten)
    #[command(after_help = "\
Examples:
  moddict restore exports/all_mods_ja_jp.csv
  moddict restore edited.csv --db moddict.db --dry-run --json")]
    Restore {
        /// CSV with key, source_text, target_text columns
        csv: PathBuf,

        #[command(flatten)]
        store: db::StoreArgs,

        /// Compute the summary without writing
        #[arg(long)]
        dry_run: bool,

        #[arg(long)]
        json: bool,
    },

    /// Report CSV rows whose (key, source_text) is not in the store
    #[command(after_help = "\
Examples:
  moddict unmatched exports/all_mods_ja_jp.csv -o unmatched_csv.txt
  moddict unmatched edited.csv --sample 10 --json")]
    Unmatched {
        csv: PathBuf,

        #[command(flatten)]
        store: db::StoreArgs,

        /// Write every unmatched row as tab-separated text
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sample entries shown in the summary
        #[arg(long, default_value_t = 30)]
        sample: usize,

        #[arg(long)]
        json: bool,
    },

    /// Inspect and try out term dictionaries
    #[command(subcommand)]
    Dict(dict::DictCommands),
}

/// Shared state for every command.
pub struct Context {
    pub settings: Settings,
    pub quiet: bool,
}

impl Context {
    /// Human summary line on stderr, unless `--quiet`.
    pub fn note(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", msg.as_ref());
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, _) => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<u8, CliError> {
    let Some(command) = cli.command else {
        // No subcommand = show usage
        eprintln!("Usage: moddict <command> [options]");
        eprintln!("       moddict --help for more information");
        return Ok(EXIT_SUCCESS);
    };

    let (settings, source) = Settings::load(cli.config.as_deref()).map_err(CliError::config)?;
    if let Some(path) = &source {
        log::info!("settings: {}", path.display());
    }
    let ctx = Context { settings, quiet: cli.quiet };

    let result = match command {
        Commands::Translate { lang, profile, out_dir, final_document, json } => {
            translate::cmd_translate(&ctx, &lang, &profile, out_dir, final_document.as_deref(), json)
        }
        Commands::Bilingual { en, ja, module, mod_id, version, output, json } => {
            translate::cmd_bilingual(&ctx, &en, &ja, &module, mod_id, version, &output, json)
        }
        Commands::Modules { profile, out_dir, json } => translate::cmd_modules(&ctx, &profile, out_dir, json),
        Commands::Book { entries, profile, output, format, root, json_dump, summary, apply_dir } => translate::cmd_book(
            &ctx,
            translate::BookArgs {
                entries: &entries,
                profile: &profile,
                output: &output,
                format,
                root: root.as_deref(),
                json_dump: json_dump.as_deref(),
                summary: summary.as_deref(),
                apply_dir: apply_dir.as_deref(),
            },
        ),
        Commands::Import { lang, official, store, json } => {
            db::cmd_import(&ctx, &lang, official.as_deref(), &store, json)
        }
        Commands::Export { store, output } => db::cmd_export(&ctx, &store, &output),
        Commands::Restore { csv, store, dry_run, json } => db::cmd_restore(&ctx, &csv, &store, dry_run, json),
        Commands::Unmatched { csv, store, output, sample, json } => {
            db::cmd_unmatched(&ctx, &csv, &store, output.as_deref(), sample, json)
        }
        // Lint exits 1 on findings, so it reports its own code.
        Commands::Dict(cmd) => return dict::cmd_dict(&ctx, cmd),
    };

    result.map(|()| EXIT_SUCCESS)
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self { code: EXIT_FORMAT, message: msg.into(), hint: None }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: config_exit_code(&err), message: err.to_string(), hint: None }
    }

    pub fn dictionary(err: TermError) -> Self {
        Self { code: term_exit_code(&err), message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn parse_book_format(s: &str) -> Result<BookFormat, String> {
    match s {
        "patchouli" => Ok(BookFormat::Patchouli),
        "mantle" => Ok(BookFormat::Mantle),
        other => Err(format!("unknown book format '{other}' (expected patchouli or mantle)")),
    }
}

/// Fail with an I/O error when an input file is absent, before trying to parse it.
pub fn require_file(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::io(format!("{}: no such file", path.display())))
    }
}

/// Print a value as the single JSON document on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::format(format!("JSON serialization error: {e}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["moddict", "export", "-o", "out.csv", "-vv", "--config", "m.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
    }

    #[test]
    fn book_format_names() {
        assert_eq!(parse_book_format("mantle").unwrap(), BookFormat::Mantle);
        assert_eq!(parse_book_format("patchouli").unwrap(), BookFormat::Patchouli);
        assert!(parse_book_format("lexicon").is_err());
    }

    #[test]
    fn book_requires_entries() {
        assert!(Cli::try_parse_from(["moddict", "book", "-p", "p.toml", "-o", "b.yaml"]).is_err());
    }
}

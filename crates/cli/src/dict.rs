//! `moddict dict`: term dictionary tools.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use moddict_terms::{lint, Hazard, SubstitutionMode, TermDictionary};

use crate::exit_codes::{EXIT_LINT_HAZARDS, EXIT_SUCCESS};
use crate::translate::load_substituter;
use crate::{print_json, CliError, Context};

#[derive(Subcommand)]
pub enum DictCommands {
    /// Report terms whose replacement is rewritten by a later, shorter term
    #[command(after_help = "\
Examples:
  moddict dict lint dictionaries/bloodmagic.toml
  moddict dict lint common.toml tconstruct.toml --json

Exits 1 when hazards are found.")]
    Lint {
        /// Dictionaries, merged in order
        #[arg(required = true)]
        dicts: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Substitute a single string and print the result
    #[command(after_help = "\
Examples:
  moddict dict apply tconstruct.toml --text 'Seared Stone Block'
  moddict dict apply bloodmagic.toml --text 'Blood Magic' --mode single-pass")]
    Apply {
        #[arg(required = true)]
        dicts: Vec<PathBuf>,

        /// Text to translate
        #[arg(long, short = 't')]
        text: String,

        /// Substitution mode (default: translate.mode from settings)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<SubstitutionMode>,

        #[arg(long)]
        json: bool,
    },
}

fn parse_mode(s: &str) -> Result<SubstitutionMode, String> {
    match s.replace('-', "_").as_str() {
        "sequential" => Ok(SubstitutionMode::Sequential),
        "single_pass" => Ok(SubstitutionMode::SinglePass),
        other => Err(format!("unknown mode '{other}' (expected sequential or single-pass)")),
    }
}

pub fn cmd_dict(ctx: &Context, cmd: DictCommands) -> Result<u8, CliError> {
    match cmd {
        DictCommands::Lint { dicts, json } => cmd_lint(ctx, &dicts, json),
        DictCommands::Apply { dicts, text, mode, json } => {
            cmd_apply(ctx, &dicts, &text, mode, json).map(|()| EXIT_SUCCESS)
        }
    }
}

#[derive(Serialize)]
struct LintReport<'a> {
    terms: usize,
    hazards: &'a [Hazard],
}

fn cmd_lint(ctx: &Context, dicts: &[PathBuf], json: bool) -> Result<u8, CliError> {
    let dictionary = TermDictionary::load_all(dicts).map_err(CliError::dictionary)?;
    let hazards = lint(&dictionary);

    for hazard in &hazards {
        ctx.note(format!("hazard: {hazard}"));
    }
    ctx.note(format!("{} terms, {} hazards", dictionary.len(), hazards.len()));
    if !hazards.is_empty() {
        ctx.note("hint:  reorder or split the terms, or use mode = \"single_pass\"");
    }

    if json {
        print_json(&LintReport {
            terms: dictionary.len(),
            hazards: &hazards,
        })?;
    }

    Ok(if hazards.is_empty() { EXIT_SUCCESS } else { EXIT_LINT_HAZARDS })
}

#[derive(Serialize)]
struct ApplyResult<'a> {
    text: &'a str,
    result: String,
    replacements: usize,
    mode: SubstitutionMode,
}

fn cmd_apply(
    ctx: &Context,
    dicts: &[PathBuf],
    text: &str,
    mode: Option<SubstitutionMode>,
    json: bool,
) -> Result<(), CliError> {
    let mode = mode.unwrap_or(ctx.settings.translate.mode);
    let substituter = load_substituter(dicts, mode)?;
    let (result, replacements) = substituter.apply_counted(text);

    if json {
        print_json(&ApplyResult { text, result, replacements, mode })?;
    } else {
        println!("{result}");
        ctx.note(format!("{replacements} replacements ({mode})"));
    }
    Ok(())
}

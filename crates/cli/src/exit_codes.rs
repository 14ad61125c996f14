//! CLI Exit Code Registry
//!
//! Single source of truth for `moddict` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | `dict lint` found hazards                             |
//! | 2    | Usage error (bad args, nothing to do)                 |
//! | 3    | I/O error (missing input, unwritable output)          |
//! | 4    | Parse error (language file, CSV, book entry)          |
//! | 5    | Format error (serializing output)                     |
//! | 6    | Configuration error (settings or profile)             |
//! | 7    | Dictionary error                                      |
//! | 8    | Store error (SQLite)                                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

use moddict_config::ConfigError;
use moddict_terms::TermError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Lint found substitution hazards. Like `diff(1)`, 1 means "findings", not failure.
pub const EXIT_LINT_HAZARDS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Inputs and outputs (3-5)
// =============================================================================

/// Input file missing or unreadable, output not writable.
pub const EXIT_IO: u8 = 3;

/// Input file read but not understood.
pub const EXIT_PARSE: u8 = 4;

/// Output could not be serialized.
pub const EXIT_FORMAT: u8 = 5;

// =============================================================================
// Domain (6-8)
// =============================================================================

/// Invalid `moddict.toml` or mod profile.
pub const EXIT_CONFIG: u8 = 6;

/// Dictionary could not be loaded or compiled.
pub const EXIT_DICTIONARY: u8 = 7;

/// SQLite store could not be opened, read or written.
pub const EXIT_STORE: u8 = 8;

/// Map a dictionary error to its exit code.
pub fn term_exit_code(err: &TermError) -> u8 {
    match err {
        TermError::Io(_) => EXIT_IO,
        _ => EXIT_DICTIONARY,
    }
}

/// Map a configuration error to its exit code. A file that cannot be read is an I/O failure.
pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Io { .. } => EXIT_IO,
        ConfigError::Parse { .. } | ConfigError::Invalid { .. } => EXIT_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_LINT_HAZARDS,
            EXIT_USAGE,
            EXIT_IO,
            EXIT_PARSE,
            EXIT_FORMAT,
            EXIT_CONFIG,
            EXIT_DICTIONARY,
            EXIT_STORE,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn error_mapping() {
        assert_eq!(term_exit_code(&TermError::Io("gone".into())), EXIT_IO);
        assert_eq!(term_exit_code(&TermError::Parse("bad".into())), EXIT_DICTIONARY);

        let path = PathBuf::from("p.toml");
        assert_eq!(config_exit_code(&ConfigError::Io { path: path.clone(), message: String::new() }), EXIT_IO);
        assert_eq!(config_exit_code(&ConfigError::Invalid { path, message: String::new() }), EXIT_CONFIG);
    }
}

use std::fmt;

#[derive(Debug)]
pub enum TermError {
    /// A dictionary entry with an empty source phrase.
    EmptyPhrase { target: String },
    /// TOML / JSON parse error.
    Parse(String),
    /// A dictionary value that is not a string.
    NonStringTarget { source: String },
    /// File extension we don't know how to read.
    UnsupportedFormat(String),
    /// Matcher construction failed (single-pass mode).
    Automaton(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPhrase { target } => {
                write!(f, "empty source phrase (target '{target}')")
            }
            Self::Parse(msg) => write!(f, "dictionary parse error: {msg}"),
            Self::NonStringTarget { source } => {
                write!(f, "term '{source}': target must be a string")
            }
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported dictionary format: '{ext}' (expected .toml or .json)")
            }
            Self::Automaton(msg) => write!(f, "cannot build matcher: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for TermError {}

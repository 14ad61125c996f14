use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io { path: PathBuf, message: String },
    /// File is not valid TOML for the expected shape.
    Parse { path: PathBuf, message: String },
    /// Parsed, but a value is out of range or inconsistent.
    Invalid { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => path,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => write!(f, "invalid {}: {message}", path.display()),
            Self::Invalid { path, message } => write!(f, "{}: {message}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {}

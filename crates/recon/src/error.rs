use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Missing required column in the CSV header.
    MissingColumn { column: String },
    /// Status text that is not one of the known tiers.
    UnknownStatus(String),
    /// CSV read / decode error.
    Csv(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::UnknownStatus(status) => write!(f, "unknown translation status: '{status}'"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

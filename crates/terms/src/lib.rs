//! `moddict-terms`: term dictionaries and phrase substitution.
//!
//! Pure crate: dictionaries come in as parsed values (or files via
//! [`TermDictionary::load`]), strings go out rewritten. No global tables.

pub mod dictionary;
pub mod error;
pub mod lint;
pub mod substitute;

pub use dictionary::{TermDictionary, TermEntry};
pub use error::TermError;
pub use lint::{lint, Hazard, HazardKind};
pub use substitute::{substitute, Substituter, SubstitutionMode};

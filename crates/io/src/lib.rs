// File I/O: language files, CSV exports, the SQLite store and YAML/JSON documents

pub mod csv;
pub mod documents;
pub mod lang;
pub mod mantle;
pub mod patchouli;
pub mod report;
pub mod store;
pub mod yaml;

pub use documents::ModMeta;
pub use lang::{read_lang_file, LangFile};
pub use store::{ImportStats, TranslationStore};

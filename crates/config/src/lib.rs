// Configuration loading

pub mod error;
pub mod profile;
pub mod settings;

pub use error::ConfigError;
pub use profile::{BookFormat, BookSettings, CategorySpec, ModProfile, ModuleSpec};
pub use settings::Settings;

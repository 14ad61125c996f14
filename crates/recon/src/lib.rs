//! `moddict-recon`: translation record reconciliation.
//!
//! Pure engine crate: receives pre-loaded records and incoming CSV rows,
//! returns bucket counts and the updates to persist. No store access.

pub mod engine;
pub mod error;
pub mod model;
pub mod unmatched;

pub use engine::{load_incoming, load_incoming_rows, plan, reconcile};
pub use error::ReconError;
pub use model::{
    IncomingRow, IncomingSet, ReconBucket, ReconPlan, ReconSummary, RecordKey, RecordUpdate,
    Status, TranslationRecord,
};
pub use unmatched::{find_unmatched, UnmatchedReport};

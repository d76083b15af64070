// Public fallible APIs in this crate share one concrete error contract (`CardexError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod jsonl;
pub mod models;
pub mod namespace;
pub(crate) mod request_log;
pub mod search;
pub mod similarity;
pub mod store;

pub use catalog::CardIndex;
pub use error::{CardexError, Result};
pub use index::{IndexBuilder, IndexMaintainer};
pub use models::{CardRecord, SearchHit, SearchRequest};
pub use namespace::{IndexKind, IndexNamespace};
pub use search::{QueryResolver, RecordFilter, Strategy};
pub use similarity::SimilarityClusterer;
pub use store::{BackendStore, KeyScan, MemoryRecordStore, RecordStore, SqliteRecordStore};

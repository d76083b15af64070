//! Keyed record store consumed by every indexing and query component.
//!
//! The store holds two kinds of values: opaque string payloads addressed by key
//! (record bodies) and unordered membership sets (posting sets). Individual
//! mutations are atomic per key; nothing here offers multi-key transactions.

use crate::error::Result;

mod backend;
mod memory;
mod scan;
mod sqlite;

pub use backend::BackendStore;
pub use memory::MemoryRecordStore;
pub use scan::KeyScan;
pub use sqlite::SqliteRecordStore;

/// One page of a prefix-bounded key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub keys: Vec<String>,
    /// Last key of this page; `None` once the key space is exhausted.
    pub next_cursor: Option<String>,
}

pub trait RecordStore: Clone + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn exists(&self, key: &str) -> Result<bool>;

    /// Removes a payload key. Returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Keys (payloads and sets alike) starting with `prefix`, ascending, strictly
    /// after `cursor` when one is given.
    fn scan_page(&self, prefix: &str, cursor: Option<&str>, page_size: usize)
    -> Result<ScanPage>;

    /// Adds `member` to the set at `key`. Returns `true` when it was not present.
    fn add_member(&self, key: &str, member: &str) -> Result<bool>;

    /// Members of the set at `key` in insertion order; empty when absent.
    fn members(&self, key: &str) -> Result<Vec<String>>;

    fn cardinality(&self, key: &str) -> Result<usize>;

    /// Removes `members` from the set at `key` and returns the remaining
    /// cardinality. A set that becomes empty is deleted in the same operation.
    fn remove_members(&self, key: &str, members: &[String]) -> Result<usize>;

    /// Deletes the set at `key`. Returns whether it existed.
    fn delete(&self, key: &str) -> Result<bool>;

    fn scan_prefix(&self, prefix: &str, page_size: usize) -> KeyScan<'_, Self> {
        KeyScan::new(self, prefix, page_size)
    }
}

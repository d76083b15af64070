use crate::error::Result;

use super::{MemoryRecordStore, RecordStore, ScanPage, SqliteRecordStore};

/// Store chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum BackendStore {
    Sqlite(SqliteRecordStore),
    Memory(MemoryRecordStore),
}

impl BackendStore {
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Memory(_) => "memory",
        }
    }
}

impl RecordStore for BackendStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Sqlite(store) => store.get(key),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.set(key, value),
            Self::Memory(store) => store.set(key, value),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        match self {
            Self::Sqlite(store) => store.exists(key),
            Self::Memory(store) => store.exists(key),
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        match self {
            Self::Sqlite(store) => store.remove(key),
            Self::Memory(store) => store.remove(key),
        }
    }

    fn scan_page(
        &self,
        prefix: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ScanPage> {
        match self {
            Self::Sqlite(store) => store.scan_page(prefix, cursor, page_size),
            Self::Memory(store) => store.scan_page(prefix, cursor, page_size),
        }
    }

    fn add_member(&self, key: &str, member: &str) -> Result<bool> {
        match self {
            Self::Sqlite(store) => store.add_member(key, member),
            Self::Memory(store) => store.add_member(key, member),
        }
    }

    fn members(&self, key: &str) -> Result<Vec<String>> {
        match self {
            Self::Sqlite(store) => store.members(key),
            Self::Memory(store) => store.members(key),
        }
    }

    fn cardinality(&self, key: &str) -> Result<usize> {
        match self {
            Self::Sqlite(store) => store.cardinality(key),
            Self::Memory(store) => store.cardinality(key),
        }
    }

    fn remove_members(&self, key: &str, members: &[String]) -> Result<usize> {
        match self {
            Self::Sqlite(store) => store.remove_members(key, members),
            Self::Memory(store) => store.remove_members(key, members),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        match self {
            Self::Sqlite(store) => store.delete(key),
            Self::Memory(store) => store.delete(key),
        }
    }
}

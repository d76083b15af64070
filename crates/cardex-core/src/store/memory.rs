use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CardexError, Result};

use super::{RecordStore, ScanPage};

#[derive(Debug, Default)]
struct PostingSet {
    order: Vec<String>,
    members: HashSet<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    kv: BTreeMap<String, String>,
    sets: BTreeMap<String, PostingSet>,
}

/// Process-local store with the same semantics as the SQLite backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| CardexError::lock_poisoned("memory store"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| CardexError::lock_poisoned("memory store"))
    }
}

fn keys_after<'a, V>(
    map: &'a BTreeMap<String, V>,
    prefix: &'a str,
    cursor: Option<&str>,
    page_size: usize,
) -> impl Iterator<Item = &'a String> + 'a {
    let lower = match cursor {
        Some(cursor) if cursor >= prefix => Bound::Excluded(cursor.to_string()),
        _ => Bound::Included(prefix.to_string()),
    };
    map.range::<String, _>((lower, Bound::Unbounded))
        .map(|(key, _)| key)
        .take_while(move |key| key.starts_with(prefix))
        .take(page_size)
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.kv.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write()?.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let state = self.read()?;
        Ok(state.kv.contains_key(key) || state.sets.contains_key(key))
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.write()?.kv.remove(key).is_some())
    }

    fn scan_page(
        &self,
        prefix: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ScanPage> {
        let page_size = page_size.max(1);
        let state = self.read()?;
        let merged = keys_after(&state.kv, prefix, cursor, page_size)
            .chain(keys_after(&state.sets, prefix, cursor, page_size))
            .collect::<BTreeSet<_>>();
        let keys = merged
            .into_iter()
            .take(page_size)
            .cloned()
            .collect::<Vec<_>>();
        let next_cursor = if keys.len() == page_size {
            keys.last().cloned()
        } else {
            None
        };
        Ok(ScanPage { keys, next_cursor })
    }

    fn add_member(&self, key: &str, member: &str) -> Result<bool> {
        let mut state = self.write()?;
        let set = state.sets.entry(key.to_string()).or_default();
        if !set.members.insert(member.to_string()) {
            return Ok(false);
        }
        set.order.push(member.to_string());
        Ok(true)
    }

    fn members(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .sets
            .get(key)
            .map(|set| set.order.clone())
            .unwrap_or_default())
    }

    fn cardinality(&self, key: &str) -> Result<usize> {
        Ok(self.read()?.sets.get(key).map_or(0, |set| set.order.len()))
    }

    fn remove_members(&self, key: &str, members: &[String]) -> Result<usize> {
        let mut state = self.write()?;
        let Some(set) = state.sets.get_mut(key) else {
            return Ok(0);
        };
        let doomed = members
            .iter()
            .filter(|member| set.members.remove(member.as_str()))
            .collect::<HashSet<_>>();
        if !doomed.is_empty() {
            set.order.retain(|member| !doomed.contains(member));
        }
        let remaining = set.order.len();
        if remaining == 0 {
            state.sets.remove(key);
        }
        Ok(remaining)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.write()?.sets.remove(key).is_some())
    }
}

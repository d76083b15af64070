use serde::{Deserialize, Serialize};

use crate::namespace::IndexKind;

/// Postings newly added while indexing one record, per index kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IndexedPostings {
    pub exact_name: usize,
    pub word: usize,
    pub prefix: usize,
    pub ngram: usize,
}

impl IndexedPostings {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.exact_name + self.word + self.prefix + self.ngram
    }

    pub(crate) fn bump(&mut self, kind: IndexKind) {
        match kind {
            IndexKind::ExactName => self.exact_name += 1,
            IndexKind::Word => self.word += 1,
            IndexKind::Prefix => self.prefix += 1,
            IndexKind::Ngram => self.ngram += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildReport {
    pub records_indexed: usize,
    pub records_skipped: usize,
    pub postings_added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairOptions {
    pub dry_run: bool,
    pub max_orphan_sample: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_orphan_sample: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindRepairReport {
    pub kind: IndexKind,
    pub keys_scanned: usize,
    pub removed_empty_indexes: usize,
    pub orphaned_refs_removed: usize,
}

impl KindRepairReport {
    #[must_use]
    pub const fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            keys_scanned: 0,
            removed_empty_indexes: 0,
            orphaned_refs_removed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairReport {
    pub run_id: String,
    pub started_at: String,
    pub dry_run: bool,
    pub kinds: Vec<KindRepairReport>,
    pub removed_empty_indexes: usize,
    pub orphaned_refs_removed: usize,
    pub orphan_ids_sample: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub records: usize,
    pub exact_name_keys: usize,
    pub word_keys: usize,
    pub prefix_keys: usize,
    pub ngram_keys: usize,
}

use tracing::{debug, info, warn};

use crate::config::IndexingConfig;
use crate::error::{CardexError, Result};
use crate::models::{BuildReport, CardRecord, IndexedPostings};
use crate::namespace::{IndexKind, IndexNamespace};
use crate::store::RecordStore;

use super::keys::{exact_key, name_ngrams, prefix_keys, word_tokens};

#[derive(Debug, Clone)]
pub struct IndexBuilder<S: RecordStore> {
    store: S,
    namespace: IndexNamespace,
    config: IndexingConfig,
}

impl<S: RecordStore> IndexBuilder<S> {
    pub const fn new(store: S, namespace: IndexNamespace, config: IndexingConfig) -> Self {
        Self {
            store,
            namespace,
            config,
        }
    }

    /// Adds `record.id` to every posting set derived from `record.name`.
    ///
    /// Re-indexing the same record adds nothing. Postings left under keys the
    /// record no longer derives are not touched.
    pub fn index_record(&self, record: &CardRecord) -> Result<IndexedPostings> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(CardexError::Validation("record id must not be empty".to_string()));
        }
        if record.name.trim().is_empty() {
            return Err(CardexError::Validation(format!(
                "record {id} has an empty name"
            )));
        }
        self.post_name(id, &record.name)
    }

    /// Re-derives every index from the stored records.
    pub fn rebuild(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let prefix = self.namespace.record_prefix();
        for key in self.store.scan_prefix(&prefix, self.config.scan_page_size) {
            let key = key?;
            let Some(id) = self.namespace.id_from_record_key(&key) else {
                continue;
            };
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            let name = match serde_json::from_str::<CardRecord>(&raw) {
                Ok(record) if !record.name.trim().is_empty() => record.name,
                Ok(_) => {
                    warn!(record_id = id, "skipping record with empty name");
                    report.records_skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(record_id = id, error = %err, "skipping undecodable record");
                    report.records_skipped += 1;
                    continue;
                }
            };
            let added = self.post_name(id, &name)?;
            report.records_indexed += 1;
            report.postings_added += added.total();
        }
        info!(
            records_indexed = report.records_indexed,
            records_skipped = report.records_skipped,
            postings_added = report.postings_added,
            "index rebuild finished"
        );
        Ok(report)
    }

    fn post_name(&self, id: &str, name: &str) -> Result<IndexedPostings> {
        let mut added = IndexedPostings::default();
        self.post(IndexKind::ExactName, &exact_key(name), id, &mut added)?;
        for token in word_tokens(name) {
            self.post(IndexKind::Word, &token, id, &mut added)?;
        }
        for prefix in prefix_keys(name, self.config.max_prefix_length) {
            self.post(IndexKind::Prefix, &prefix, id, &mut added)?;
        }
        for gram in name_ngrams(name) {
            self.post(IndexKind::Ngram, &gram, id, &mut added)?;
        }
        debug!(record_id = id, postings_added = added.total(), "record indexed");
        Ok(added)
    }

    fn post(
        &self,
        kind: IndexKind,
        derived: &str,
        id: &str,
        added: &mut IndexedPostings,
    ) -> Result<()> {
        if self
            .store
            .add_member(&self.namespace.index_key(kind, derived), id)?
        {
            added.bump(kind);
        }
        Ok(())
    }
}

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::IndexingConfig;
use crate::error::Result;
use crate::models::{KindRepairReport, RepairOptions, RepairReport};
use crate::namespace::{IndexKind, IndexNamespace};
use crate::store::RecordStore;

/// Sweeps posting sets for references to records that no longer exist.
///
/// The sweep is not a transaction. Only the members found missing at check
/// time are removed, so ids posted while the sweep runs survive it.
#[derive(Debug, Clone)]
pub struct IndexMaintainer<S: RecordStore> {
    store: S,
    namespace: IndexNamespace,
    config: IndexingConfig,
}

#[derive(Debug, Default)]
struct OrphanSample {
    limit: usize,
    seen: HashSet<String>,
    ids: Vec<String>,
}

impl OrphanSample {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn record(&mut self, id: &str) {
        if self.ids.len() < self.limit && self.seen.insert(id.to_string()) {
            self.ids.push(id.to_string());
        }
    }
}

impl<S: RecordStore> IndexMaintainer<S> {
    pub const fn new(store: S, namespace: IndexNamespace, config: IndexingConfig) -> Self {
        Self {
            store,
            namespace,
            config,
        }
    }

    pub fn repair(&self, kind: IndexKind) -> Result<KindRepairReport> {
        self.repair_with_options(kind, &RepairOptions::default())
    }

    pub fn repair_with_options(
        &self,
        kind: IndexKind,
        options: &RepairOptions,
    ) -> Result<KindRepairReport> {
        let mut sample = OrphanSample::new(options.max_orphan_sample);
        self.repair_kind(kind, options.dry_run, &mut sample)
    }

    pub fn repair_all(&self) -> Result<RepairReport> {
        self.repair_all_with_options(&RepairOptions::default())
    }

    pub fn repair_all_with_options(&self, options: &RepairOptions) -> Result<RepairReport> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now().to_rfc3339();
        let mut sample = OrphanSample::new(options.max_orphan_sample);
        let mut kinds = Vec::with_capacity(IndexKind::ALL.len());
        for kind in IndexKind::ALL {
            kinds.push(self.repair_kind(kind, options.dry_run, &mut sample)?);
        }

        let report = RepairReport {
            removed_empty_indexes: kinds.iter().map(|k| k.removed_empty_indexes).sum(),
            orphaned_refs_removed: kinds.iter().map(|k| k.orphaned_refs_removed).sum(),
            run_id,
            started_at,
            dry_run: options.dry_run,
            kinds,
            orphan_ids_sample: sample.ids,
        };
        info!(
            run_id = %report.run_id,
            dry_run = report.dry_run,
            removed_empty_indexes = report.removed_empty_indexes,
            orphaned_refs_removed = report.orphaned_refs_removed,
            "index repair finished"
        );
        Ok(report)
    }

    fn repair_kind(
        &self,
        kind: IndexKind,
        dry_run: bool,
        sample: &mut OrphanSample,
    ) -> Result<KindRepairReport> {
        let mut report = KindRepairReport::new(kind);
        let prefix = self.namespace.index_prefix(kind);
        for key in self.store.scan_prefix(&prefix, self.config.scan_page_size) {
            let key = key?;
            report.keys_scanned += 1;

            let members = self.store.members(&key)?;
            if members.is_empty() {
                continue;
            }
            let mut orphans = Vec::new();
            for id in &members {
                if !self.store.exists(&self.namespace.record_key(id))? {
                    orphans.push(id.clone());
                }
            }
            if orphans.is_empty() {
                continue;
            }
            for id in &orphans {
                sample.record(id);
            }

            let emptied = if dry_run {
                orphans.len() == members.len()
            } else {
                self.store.remove_members(&key, &orphans)? == 0
            };
            report.orphaned_refs_removed += orphans.len();
            if emptied {
                report.removed_empty_indexes += 1;
            }
            debug!(
                index_key = %key,
                orphans = orphans.len(),
                emptied,
                dry_run,
                "repaired posting set"
            );
        }
        Ok(report)
    }
}

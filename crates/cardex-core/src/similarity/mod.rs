//! Offline near-duplicate detection over stored record names.
//!
//! Clustering is greedy single-link: records are visited in key order, each
//! unassigned record seeds a cluster, and every later unassigned record similar
//! enough to that seed joins it. Two records that are each similar to a third
//! can end up in different clusters. Names are compared exactly as stored, so
//! `Bolt` and `bolt` are one edit apart. The pass is quadratic in the number of
//! records and meant for batch review, not query paths.

use tracing::{info, warn};

use crate::config::{IndexingConfig, SimilarityConfig};
use crate::error::{CardexError, Result};
use crate::models::{CardRecord, ClusterMember, SimilarCluster};
use crate::namespace::IndexNamespace;
use crate::store::RecordStore;

mod edit_distance;

pub use edit_distance::{edit_distance, name_similarity};

use edit_distance::char_similarity;

#[derive(Debug, Clone)]
pub struct SimilarityClusterer<S: RecordStore> {
    store: S,
    namespace: IndexNamespace,
    indexing: IndexingConfig,
    config: SimilarityConfig,
}

struct NamedRecord {
    member: ClusterMember,
    chars: Vec<char>,
}

impl<S: RecordStore> SimilarityClusterer<S> {
    pub const fn new(
        store: S,
        namespace: IndexNamespace,
        indexing: IndexingConfig,
        config: SimilarityConfig,
    ) -> Self {
        Self {
            store,
            namespace,
            indexing,
            config,
        }
    }

    /// Clusters of at least two records, largest first, capped at
    /// `max_clusters`.
    pub fn find_similar(&self, threshold: f64) -> Result<Vec<SimilarCluster>> {
        validate_threshold(threshold)?;
        let records = self.load_names()?;
        let mut clusters = cluster_greedy(&records, threshold);
        clusters.sort_by(|a, b| b.len().cmp(&a.len()));
        let found = clusters.len();
        clusters.truncate(self.config.max_clusters);
        info!(
            records = records.len(),
            clusters_found = found,
            clusters_reported = clusters.len(),
            threshold,
            "similarity clustering finished"
        );
        Ok(clusters)
    }

    pub fn find_similar_default(&self) -> Result<Vec<SimilarCluster>> {
        self.find_similar(self.config.threshold)
    }

    fn load_names(&self) -> Result<Vec<NamedRecord>> {
        let prefix = self.namespace.record_prefix();
        let mut records = Vec::new();
        for key in self.store.scan_prefix(&prefix, self.indexing.scan_page_size) {
            let key = key?;
            let Some(id) = self.namespace.id_from_record_key(&key) else {
                continue;
            };
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            let record = match serde_json::from_str::<CardRecord>(&raw) {
                Ok(record) => record,
                Err(err) => {
                    warn!(record_id = id, error = %err, "skipping undecodable record");
                    continue;
                }
            };
            records.push(NamedRecord {
                chars: record.name.chars().collect(),
                member: ClusterMember {
                    name: record.name,
                    id: id.to_string(),
                    set_code: record.set_code,
                },
            });
        }
        Ok(records)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        return Ok(());
    }
    Err(CardexError::Validation(format!(
        "similarity threshold must be within [0, 1], got {threshold}"
    )))
}

#[allow(
    clippy::cast_precision_loss,
    reason = "name lengths are far below f64 mantissa precision"
)]
fn cluster_greedy(records: &[NamedRecord], threshold: f64) -> Vec<SimilarCluster> {
    let mut assigned = vec![false; records.len()];
    let mut clusters = Vec::new();
    for (seed_idx, seed) in records.iter().enumerate() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;
        let mut members = vec![seed.member.clone()];
        for (idx, other) in records.iter().enumerate().skip(seed_idx + 1) {
            if assigned[idx] {
                continue;
            }
            // Length difference alone bounds the similarity from above.
            let (short, long) = (
                seed.chars.len().min(other.chars.len()),
                seed.chars.len().max(other.chars.len()),
            );
            if long > 0 && (short as f64 / long as f64) + f64::EPSILON < threshold {
                continue;
            }
            if char_similarity(&seed.chars, &other.chars) >= threshold {
                assigned[idx] = true;
                members.push(other.member.clone());
            }
        }
        if members.len() > 1 {
            clusters.push(SimilarCluster { members });
        }
    }
    clusters
}

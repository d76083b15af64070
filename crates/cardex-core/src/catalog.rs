use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::config::{AppConfig, StoreBackend};
use crate::error::{CardexError, Result};
use crate::index::{IndexBuilder, IndexMaintainer};
use crate::models::{
    BuildReport, CardRecord, IndexStats, IndexedPostings, KindRepairReport, RepairOptions,
    RepairReport, SearchHit, SearchOutcome, SearchRequest, SimilarCluster,
};
use crate::namespace::IndexKind;
use crate::request_log::RequestLog;
use crate::search::QueryResolver;
use crate::similarity::SimilarityClusterer;
use crate::store::{BackendStore, MemoryRecordStore, RecordStore, SqliteRecordStore};

const DATABASE_FILE: &str = "cardex.sqlite3";

/// Entry point tying the record store to its indexes.
///
/// Writes go to the record store first and are then indexed. Removing a record
/// leaves its postings in place until the next repair.
#[derive(Debug, Clone)]
pub struct CardIndex {
    store: BackendStore,
    config: AppConfig,
    builder: IndexBuilder<BackendStore>,
    maintainer: IndexMaintainer<BackendStore>,
    resolver: QueryResolver<BackendStore>,
    clusterer: SimilarityClusterer<BackendStore>,
    request_log: RequestLog,
}

impl CardIndex {
    /// Opens (creating when needed) the catalog under `root` with configuration
    /// read from the environment.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(root, AppConfig::from_env()?)
    }

    pub fn open_with_config(root: impl Into<PathBuf>, config: AppConfig) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let store = match config.store.backend {
            StoreBackend::Sqlite => {
                BackendStore::Sqlite(SqliteRecordStore::open(root.join(DATABASE_FILE))?)
            }
            StoreBackend::Memory => BackendStore::Memory(MemoryRecordStore::new()),
        };
        info!(root = %root.display(), backend = store.backend_name(), "card index opened");
        Ok(Self::from_parts(store, config, RequestLog::under_root(&root)))
    }

    /// Ephemeral catalog with default configuration and no request log.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_parts(
            BackendStore::Memory(MemoryRecordStore::new()),
            AppConfig::default(),
            RequestLog::disabled(),
        )
    }

    fn from_parts(store: BackendStore, config: AppConfig, request_log: RequestLog) -> Self {
        let namespace = config.namespace.clone();
        Self {
            builder: IndexBuilder::new(store.clone(), namespace.clone(), config.indexing),
            maintainer: IndexMaintainer::new(store.clone(), namespace.clone(), config.indexing),
            resolver: QueryResolver::new(store.clone(), namespace.clone(), config.search),
            clusterer: SimilarityClusterer::new(
                store.clone(),
                namespace,
                config.indexing,
                config.similarity,
            ),
            store,
            config,
            request_log,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &BackendStore {
        &self.store
    }

    #[must_use]
    pub fn request_log_path(&self) -> Option<&Path> {
        self.request_log.path()
    }

    /// Stores `record` and adds its postings.
    pub fn upsert_record(&self, record: &CardRecord) -> Result<IndexedPostings> {
        self.observe(
            "record.upsert",
            json!({ "id": record.id }),
            || {
                let id = record.id.trim();
                if id.is_empty() || record.name.trim().is_empty() {
                    return Err(CardexError::Validation(
                        "record id and name must not be empty".to_string(),
                    ));
                }
                let mut stored = record.clone();
                stored.id = id.to_string();
                self.store.set(
                    &self.config.namespace.record_key(id),
                    &serde_json::to_string(&stored)?,
                )?;
                self.builder.index_record(&stored)
            },
            |added| json!({ "postings_added": added.total() }),
        )
    }

    /// Deletes the stored record only; its postings become orphans for repair.
    pub fn remove_record(&self, id: &str) -> Result<bool> {
        self.observe(
            "record.remove",
            json!({ "id": id }),
            || self.store.remove(&self.config.namespace.record_key(id.trim())),
            |removed| json!({ "removed": removed }),
        )
    }

    pub fn get_record(&self, id: &str) -> Result<Option<CardRecord>> {
        self.observe(
            "record.get",
            json!({ "id": id }),
            || {
                self.store
                    .get(&self.config.namespace.record_key(id.trim()))?
                    .map(|raw| serde_json::from_str::<CardRecord>(&raw).map_err(CardexError::from))
                    .transpose()
            },
            |found| json!({ "found": found.is_some() }),
        )
    }

    /// Like [`CardIndex::get_record`] but an unknown id is a `NotFound` error.
    pub fn require_record(&self, id: &str) -> Result<CardRecord> {
        self.get_record(id)?
            .ok_or_else(|| CardexError::NotFound(format!("record {}", id.trim())))
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.search_with_outcome(request).map(|outcome| outcome.hits)
    }

    pub fn search_with_outcome(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        self.observe(
            "search",
            json!({
                "query": request.query,
                "max_results": request.max_results,
                "filters": request.filters.len(),
            }),
            || self.resolver.search_with_outcome(request),
            |outcome| {
                json!({
                    "hits": outcome.hits.len(),
                    "strategies_run": outcome.strategies_run,
                    "candidates_considered": outcome.candidates_considered,
                })
            },
        )
    }

    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        self.observe(
            "autocomplete",
            json!({ "prefix": prefix, "limit": limit }),
            || self.resolver.autocomplete(prefix, limit),
            |names| json!({ "names": names.len() }),
        )
    }

    pub fn autocomplete_prefixes(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        self.observe(
            "autocomplete.prefixes",
            json!({ "text": text, "limit": limit }),
            || self.resolver.autocomplete_prefixes(text, limit),
            |prefixes| json!({ "prefixes": prefixes.len() }),
        )
    }

    /// Names sharing a word or trigram with `name`; see
    /// [`QueryResolver::similar_names`].
    pub fn similar_names(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        self.observe(
            "similarity.names",
            json!({ "name": name, "limit": limit }),
            || self.resolver.similar_names(name, limit),
            |names| json!({ "names": names.len() }),
        )
    }

    pub fn rebuild_indexes(&self) -> Result<BuildReport> {
        self.observe(
            "index.rebuild",
            Value::Null,
            || self.builder.rebuild(),
            |report| json!(report),
        )
    }

    pub fn repair_all(&self) -> Result<RepairReport> {
        self.repair_all_with_options(&RepairOptions {
            dry_run: false,
            max_orphan_sample: self.config.maintenance.orphan_sample,
        })
    }

    pub fn repair_all_with_options(&self, options: &RepairOptions) -> Result<RepairReport> {
        self.observe(
            "index.repair",
            json!({ "dry_run": options.dry_run }),
            || self.maintainer.repair_all_with_options(options),
            |report| {
                json!({
                    "run_id": report.run_id,
                    "removed_empty_indexes": report.removed_empty_indexes,
                    "orphaned_refs_removed": report.orphaned_refs_removed,
                })
            },
        )
    }

    pub fn repair_kind(&self, kind: IndexKind, options: &RepairOptions) -> Result<KindRepairReport> {
        self.observe(
            "index.repair",
            json!({ "dry_run": options.dry_run, "kind": kind.as_str() }),
            || self.maintainer.repair_with_options(kind, options),
            |report| json!(report),
        )
    }

    /// Near-duplicate name clusters; `None` uses the configured threshold.
    pub fn find_similar(&self, threshold: Option<f64>) -> Result<Vec<SimilarCluster>> {
        let threshold = threshold.unwrap_or(self.config.similarity.threshold);
        self.observe(
            "similarity.find",
            json!({ "threshold": threshold }),
            || self.clusterer.find_similar(threshold),
            |clusters| json!({ "clusters": clusters.len() }),
        )
    }

    pub fn stats(&self) -> Result<IndexStats> {
        self.observe(
            "stats",
            Value::Null,
            || {
                let namespace = &self.config.namespace;
                let mut stats = IndexStats {
                    records: self.count_keys(&namespace.record_prefix())?,
                    ..IndexStats::default()
                };
                for kind in IndexKind::ALL {
                    let keys = self.count_keys(&namespace.index_prefix(kind))?;
                    match kind {
                        IndexKind::ExactName => stats.exact_name_keys = keys,
                        IndexKind::Word => stats.word_keys = keys,
                        IndexKind::Prefix => stats.prefix_keys = keys,
                        IndexKind::Ngram => stats.ngram_keys = keys,
                    }
                }
                Ok(stats)
            },
            |stats| json!(stats),
        )
    }

    fn count_keys(&self, prefix: &str) -> Result<usize> {
        let mut count = 0usize;
        for key in self
            .store
            .scan_prefix(prefix, self.config.indexing.scan_page_size)
        {
            key?;
            count += 1;
        }
        Ok(count)
    }

    fn observe<T>(
        &self,
        operation: &str,
        params: Value,
        run: impl FnOnce() -> Result<T>,
        summarize: impl FnOnce(&T) -> Value,
    ) -> Result<T> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        match run() {
            Ok(value) => {
                let details = merge_details(params, summarize(&value));
                self.request_log
                    .log_status(request_id, operation, started, details);
                Ok(value)
            }
            Err(err) => {
                let details = merge_details(params, Value::Null);
                self.request_log
                    .log_error(request_id, operation, started, &err, details);
                Err(err)
            }
        }
    }
}

fn merge_details(params: Value, summary: Value) -> Option<Value> {
    match (params, summary) {
        (Value::Null, Value::Null) => None,
        (Value::Object(mut params), Value::Object(summary)) => {
            params.extend(summary);
            Some(Value::Object(params))
        }
        (Value::Null, other) | (other, Value::Null) => Some(other),
        (params, summary) => Some(json!({ "params": params, "result": summary })),
    }
}

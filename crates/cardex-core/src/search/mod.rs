//! Query resolution: strategy cascade, candidate ranking, lazy filtering.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{CardexError, Result};
use crate::index::keys::{name_ngrams, word_tokens};
use crate::models::{CardRecord, SearchHit, SearchOutcome, SearchRequest};
use crate::namespace::{IndexKind, IndexNamespace};
use crate::store::RecordStore;

mod filter;
mod rank;
mod strategy;

pub use filter::RecordFilter;
pub use strategy::Strategy;

use rank::CandidatePool;
use strategy::SHORT_CIRCUIT_SCORE;

const SIMILAR_NAME_MIN_WORD: usize = 3;

#[derive(Debug, Clone)]
pub struct QueryResolver<S: RecordStore> {
    store: S,
    namespace: IndexNamespace,
    config: SearchConfig,
}

impl<S: RecordStore> QueryResolver<S> {
    pub const fn new(store: S, namespace: IndexNamespace, config: SearchConfig) -> Self {
        Self {
            store,
            namespace,
            config,
        }
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.search_with_outcome(request).map(|outcome| outcome.hits)
    }

    pub fn search_with_outcome(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let query = normalize_query(&request.query)?;
        let filter = RecordFilter::from_pairs(request.filters.iter().map(|(k, v)| (k, v)));
        let limit = self.config.resolve_max_results(request.max_results);

        let mut pool = CandidatePool::default();
        let mut strategies_run = Vec::new();
        for strategy in Strategy::CASCADE {
            let found = strategy.run(&self.store, &self.namespace, &query)?;
            let confident = found.iter().any(|c| c.score >= SHORT_CIRCUIT_SCORE);
            debug!(strategy = %strategy, candidates = found.len(), confident, "strategy evaluated");
            strategies_run.push(strategy.as_str().to_string());
            pool.extend(found);
            if confident {
                break;
            }
        }

        let candidates_considered = pool.len();
        let mut hits = Vec::new();
        for candidate in pool.into_ranked() {
            if hits.len() >= limit {
                break;
            }
            let Some(record) = self.fetch_record(&candidate.record_id)? else {
                continue;
            };
            if filter.matches(&record) {
                hits.push(project(candidate.record_id, record, candidate.score));
            }
        }

        Ok(SearchOutcome {
            hits,
            strategies_run,
            candidates_considered,
        })
    }

    /// Distinct names of records posted under `prefix`, in discovery order.
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let prefix = normalize_query(prefix)?;
        let limit = self.config.resolve_max_results(Some(limit));
        let ids = self
            .store
            .members(&self.namespace.index_key(IndexKind::Prefix, &prefix))?;

        let mut names = Vec::new();
        for id in ids {
            if names.len() >= limit {
                break;
            }
            let Some(record) = self.fetch_record(&id)? else {
                continue;
            };
            if !names.contains(&record.name) {
                names.push(record.name);
            }
        }
        Ok(names)
    }

    /// Prefix keys starting with `text`, in key order.
    ///
    /// Blank `text` is allowed and lists prefix keys from the beginning.
    pub fn autocomplete_prefixes(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        let limit = self.config.resolve_max_results(Some(limit));
        let kind_prefix = self.namespace.index_prefix(IndexKind::Prefix);
        let scan_from = format!("{kind_prefix}{}", text.trim().to_lowercase());

        let mut prefixes = Vec::new();
        for key in self.store.scan_prefix(&scan_from, limit).take(limit) {
            let key = key?;
            if let Some(prefix) = key.strip_prefix(kind_prefix.as_str()) {
                prefixes.push(prefix.to_string());
            }
        }
        Ok(prefixes)
    }

    /// Names sharing a word (3+ characters) or any trigram with `name`.
    ///
    /// Word postings are visited before n-gram postings; the first sighting of
    /// a record fixes its position. Unlike [`QueryResolver::search`] nothing is
    /// scored or thresholded, so one shared trigram is enough.
    pub fn similar_names(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        let name = normalize_query(name)?;
        let limit = self.config.resolve_max_results(Some(limit));

        let mut keys = Vec::new();
        for token in word_tokens(&name) {
            if token.chars().count() >= SIMILAR_NAME_MIN_WORD {
                keys.push(self.namespace.index_key(IndexKind::Word, &token));
            }
        }
        for gram in name_ngrams(&name) {
            keys.push(self.namespace.index_key(IndexKind::Ngram, &gram));
        }

        let mut visited = HashSet::new();
        let mut seen_keys = HashSet::new();
        let mut names = Vec::new();
        for key in keys {
            if !seen_keys.insert(key.clone()) {
                continue;
            }
            for id in self.store.members(&key)? {
                if names.len() >= limit {
                    return Ok(names);
                }
                if !visited.insert(id.clone()) {
                    continue;
                }
                let Some(record) = self.fetch_record(&id)? else {
                    continue;
                };
                if !names.contains(&record.name) {
                    names.push(record.name);
                }
            }
        }
        Ok(names)
    }

    /// Missing or undecodable records read as absent; store failures propagate.
    fn fetch_record(&self, id: &str) -> Result<Option<CardRecord>> {
        let Some(raw) = self.store.get(&self.namespace.record_key(id))? else {
            return Ok(None);
        };
        match serde_json::from_str::<CardRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(record_id = id, error = %err, "skipping undecodable record");
                Ok(None)
            }
        }
    }
}

fn normalize_query(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CardexError::EmptyQuery);
    }
    Ok(trimmed.to_lowercase())
}

fn project(id: String, record: CardRecord, score: u32) -> SearchHit {
    SearchHit {
        id,
        name: record.name,
        set_code: record.set_code,
        rarity: record.rarity,
        mana_value: record.mana_value,
        types: record.types,
        colors: record.colors,
        score,
    }
}

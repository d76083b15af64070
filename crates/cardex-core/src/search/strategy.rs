use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::index::keys::{exact_key, name_ngrams, word_tokens};
use crate::models::Candidate;
use crate::namespace::{IndexKind, IndexNamespace};
use crate::store::RecordStore;

const EXACT_SCORE: u32 = 100;
const WORD_SCORE: u32 = 80;
const PREFIX_SCORE: u32 = 60;
const NGRAM_MAX_SCORE: u32 = 40;
/// Share of the query's n-grams (in tenths) a record must match.
const NGRAM_MATCH_TENTHS: usize = 3;

/// A candidate at or above this score ends the cascade.
pub(super) const SHORT_CIRCUIT_SCORE: u32 = WORD_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Exact,
    Word,
    Prefix,
    Ngram,
}

impl Strategy {
    /// Evaluation order, most precise first.
    pub const CASCADE: [Self; 4] = [Self::Exact, Self::Word, Self::Prefix, Self::Ngram];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Word => "word",
            Self::Prefix => "prefix",
            Self::Ngram => "ngram",
        }
    }

    /// Upper bound of the scores this strategy assigns.
    pub const fn base_score(self) -> u32 {
        match self {
            Self::Exact => EXACT_SCORE,
            Self::Word => WORD_SCORE,
            Self::Prefix => PREFIX_SCORE,
            Self::Ngram => NGRAM_MAX_SCORE,
        }
    }

    /// Candidates for a normalized (trimmed, lowercased) query, in posting order.
    pub fn run<S: RecordStore>(
        self,
        store: &S,
        namespace: &IndexNamespace,
        query: &str,
    ) -> Result<Vec<Candidate>> {
        match self {
            Self::Exact => lookup(store, namespace, IndexKind::ExactName, &exact_key(query), EXACT_SCORE),
            Self::Word => word_match(store, namespace, query),
            Self::Prefix => lookup(store, namespace, IndexKind::Prefix, query, PREFIX_SCORE),
            Self::Ngram => ngram_match(store, namespace, query),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lookup<S: RecordStore>(
    store: &S,
    namespace: &IndexNamespace,
    kind: IndexKind,
    derived: &str,
    score: u32,
) -> Result<Vec<Candidate>> {
    Ok(store
        .members(&namespace.index_key(kind, derived))?
        .into_iter()
        .map(|record_id| Candidate { record_id, score })
        .collect())
}

fn word_match<S: RecordStore>(
    store: &S,
    namespace: &IndexNamespace,
    query: &str,
) -> Result<Vec<Candidate>> {
    let tokens = word_tokens(query);
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(Vec::new());
    };

    let mut survivors = store.members(&namespace.index_key(IndexKind::Word, first))?;
    for token in rest {
        if survivors.is_empty() {
            break;
        }
        let postings = store
            .members(&namespace.index_key(IndexKind::Word, token))?
            .into_iter()
            .collect::<HashSet<_>>();
        survivors.retain(|id| postings.contains(id));
    }
    Ok(survivors
        .into_iter()
        .map(|record_id| Candidate {
            record_id,
            score: WORD_SCORE,
        })
        .collect())
}

pub(super) fn ngram_min_matches(total: usize) -> usize {
    (total * NGRAM_MATCH_TENTHS).div_ceil(10).max(1)
}

pub(super) fn ngram_score(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = matched.saturating_mul(NGRAM_MAX_SCORE as usize) / total;
    u32::try_from(scaled).map_or(NGRAM_MAX_SCORE, |score| score.min(NGRAM_MAX_SCORE))
}

fn ngram_match<S: RecordStore>(
    store: &S,
    namespace: &IndexNamespace,
    query: &str,
) -> Result<Vec<Candidate>> {
    let grams = name_ngrams(query);
    if grams.is_empty() {
        return Ok(Vec::new());
    }
    let total = grams.len();

    let mut weights = Vec::<(String, usize)>::new();
    for gram in grams {
        match weights.iter_mut().find(|(seen, _)| *seen == gram) {
            Some((_, weight)) => *weight += 1,
            None => weights.push((gram, 1)),
        }
    }

    let mut order = Vec::<String>::new();
    let mut tally = HashMap::<String, usize>::new();
    for (gram, weight) in &weights {
        for id in store.members(&namespace.index_key(IndexKind::Ngram, gram))? {
            let count = tally.entry(id.clone()).or_insert_with(|| {
                order.push(id.clone());
                0
            });
            *count += weight;
        }
    }

    let min_matches = ngram_min_matches(total);
    Ok(order
        .into_iter()
        .filter_map(|record_id| {
            let matched = tally.get(&record_id).copied().unwrap_or_default();
            (matched >= min_matches).then(|| Candidate {
                score: ngram_score(matched, total),
                record_id,
            })
        })
        .collect())
}

use serde::{Deserialize, Serialize};

/// Transient `(record_id, score)` pair produced while resolving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub record_id: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub filters: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

/// Projection of a matched record returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub set_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_value: Option<f64>,
    pub types: Vec<String>,
    pub colors: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub strategies_run: Vec<String>,
    pub candidates_considered: usize,
}

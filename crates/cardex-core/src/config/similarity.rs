use super::env::{parse_unit_interval, read_env_usize};

const ENV_SIMILARITY_THRESHOLD: &str = "CARDEX_SIMILARITY_THRESHOLD";
const ENV_SIMILARITY_MAX_CLUSTERS: &str = "CARDEX_SIMILARITY_MAX_CLUSTERS";

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_MAX_CLUSTERS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityConfig {
    pub threshold: f64,
    /// Reporting cap: only the largest clusters are returned.
    pub max_clusters: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_clusters: DEFAULT_MAX_CLUSTERS,
        }
    }
}

impl SimilarityConfig {
    pub(super) fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold: parse_unit_interval(std::env::var(ENV_SIMILARITY_THRESHOLD).ok().as_deref())
                .unwrap_or(defaults.threshold),
            max_clusters: read_env_usize(ENV_SIMILARITY_MAX_CLUSTERS, defaults.max_clusters, 1),
        }
    }
}

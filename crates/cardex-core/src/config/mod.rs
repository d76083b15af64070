use crate::error::Result;
use crate::namespace::IndexNamespace;

mod env;
mod indexing;
mod maintenance;
mod search;
mod similarity;
mod store;

pub use indexing::{DEFAULT_MAX_PREFIX_LENGTH, DEFAULT_SCAN_PAGE_SIZE, IndexingConfig};
pub use maintenance::MaintenanceConfig;
pub use search::{DEFAULT_MAX_RESULTS, SearchConfig};
pub use similarity::{DEFAULT_MAX_CLUSTERS, DEFAULT_SIMILARITY_THRESHOLD, SimilarityConfig};
pub use store::{StoreBackend, StoreConfig};

const ENV_NAMESPACE_ROOT: &str = "CARDEX_NAMESPACE_ROOT";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub namespace: IndexNamespace,
    pub indexing: IndexingConfig,
    pub search: SearchConfig,
    pub maintenance: MaintenanceConfig,
    pub similarity: SimilarityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            store: StoreConfig::from_env()?,
            namespace: env::read_non_empty_env(ENV_NAMESPACE_ROOT)
                .map(|root| IndexNamespace::with_root(&root))
                .unwrap_or_default(),
            indexing: IndexingConfig::from_env(),
            search: SearchConfig::from_env(),
            maintenance: MaintenanceConfig::from_env(),
            similarity: SimilarityConfig::from_env(),
        })
    }
}

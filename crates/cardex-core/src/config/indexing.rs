use super::env::read_env_usize;

const ENV_MAX_PREFIX_LENGTH: &str = "CARDEX_MAX_PREFIX_LENGTH";
const ENV_SCAN_PAGE_SIZE: &str = "CARDEX_SCAN_PAGE_SIZE";

pub const DEFAULT_MAX_PREFIX_LENGTH: usize = 30;
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Longest prefix key written for a name or word.
    pub max_prefix_length: usize,
    /// Keys fetched per page when sweeping the store.
    pub scan_page_size: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_prefix_length: DEFAULT_MAX_PREFIX_LENGTH,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }
}

impl IndexingConfig {
    pub(super) fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_prefix_length: read_env_usize(
                ENV_MAX_PREFIX_LENGTH,
                defaults.max_prefix_length,
                1,
            ),
            scan_page_size: read_env_usize(ENV_SCAN_PAGE_SIZE, defaults.scan_page_size, 1),
        }
    }
}

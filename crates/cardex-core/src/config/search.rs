use super::env::read_env_usize;

const ENV_SEARCH_MAX_RESULTS: &str = "CARDEX_SEARCH_MAX_RESULTS";

pub const DEFAULT_MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub default_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchConfig {
    pub(super) fn from_env() -> Self {
        Self {
            default_max_results: read_env_usize(ENV_SEARCH_MAX_RESULTS, DEFAULT_MAX_RESULTS, 1),
        }
    }

    /// `None` and zero fall back to the configured default.
    #[must_use]
    pub fn resolve_max_results(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|value| *value > 0)
            .unwrap_or(self.default_max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_results_defaults_when_missing_or_zero() {
        let config = SearchConfig::default();
        assert_eq!(config.resolve_max_results(None), 50);
        assert_eq!(config.resolve_max_results(Some(0)), 50);
        assert_eq!(config.resolve_max_results(Some(3)), 3);
    }
}

use crate::error::{CardexError, Result};

use super::env::read_non_empty_env;

pub(super) const ENV_STORE_BACKEND: &str = "CARDEX_STORE_BACKEND";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StoreBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    pub(super) fn parse(raw: Option<&str>) -> Result<Self> {
        let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            None | Some("sqlite") => Ok(Self::Sqlite),
            Some("memory") => Ok(Self::Memory),
            Some(other) => Err(CardexError::Validation(format!(
                "invalid {ENV_STORE_BACKEND}: {other} (expected sqlite|memory)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    pub(super) fn from_env() -> Result<Self> {
        Ok(Self {
            backend: StoreBackend::parse(read_non_empty_env(ENV_STORE_BACKEND).as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::StoreBackend;

    #[test]
    fn store_backend_parser_defaults_to_sqlite_when_unset() {
        assert_eq!(
            StoreBackend::parse(None).expect("default backend"),
            StoreBackend::Sqlite
        );
    }

    #[test]
    fn store_backend_parser_accepts_memory() {
        assert_eq!(
            StoreBackend::parse(Some(" Memory ")).expect("memory backend"),
            StoreBackend::Memory
        );
    }

    #[test]
    fn store_backend_parser_rejects_unknown_values() {
        assert!(StoreBackend::parse(Some("redis")).is_err());
        assert!(StoreBackend::parse(Some("")).is_err());
    }
}

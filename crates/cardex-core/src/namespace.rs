use serde::{Deserialize, Serialize};

const RECORD_PREFIX: &str = "card:";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IndexKind {
    ExactName,
    Word,
    Prefix,
    Ngram,
}

impl IndexKind {
    pub const ALL: [Self; 4] = [Self::ExactName, Self::Word, Self::Prefix, Self::Ngram];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactName => "exact-name",
            Self::Word => "word",
            Self::Prefix => "prefix",
            Self::Ngram => "ngram",
        }
    }
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndexKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "exact-name" | "exact_name" | "exact" => Ok(Self::ExactName),
            "word" => Ok(Self::Word),
            "prefix" => Ok(Self::Prefix),
            "ngram" => Ok(Self::Ngram),
            other => Err(format!("unknown index kind: {other}")),
        }
    }
}

/// Key layout shared by every component that touches the record store.
///
/// Record payloads live under `<root>card:<id>`; posting sets live under
/// `<root><kind>:<derived-key>`. The root is empty unless configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNamespace {
    root: String,
}

impl Default for IndexNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexNamespace {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: String::new(),
        }
    }

    /// Namespace rooted under `root`, e.g. `mtg` yields `mtg:card:<id>`.
    #[must_use]
    pub fn with_root(root: &str) -> Self {
        let trimmed = root.trim().trim_end_matches(':');
        if trimmed.is_empty() {
            return Self::new();
        }
        Self {
            root: format!("{trimmed}:"),
        }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn record_prefix(&self) -> String {
        format!("{}{RECORD_PREFIX}", self.root)
    }

    #[must_use]
    pub fn record_key(&self, id: &str) -> String {
        format!("{}{RECORD_PREFIX}{id}", self.root)
    }

    #[must_use]
    pub fn id_from_record_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.root.as_str())?
            .strip_prefix(RECORD_PREFIX)
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn index_prefix(&self, kind: IndexKind) -> String {
        format!("{}{}:", self.root, kind.as_str())
    }

    #[must_use]
    pub fn index_key(&self, kind: IndexKind, derived: &str) -> String {
        format!("{}{}:{derived}", self.root, kind.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// One catalog item as persisted in the record store.
///
/// Attributes other than `id` and `name` may be absent in stored payloads; an
/// absent attribute deserializes to its empty value and fails any filter
/// predicate that targets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CardRecord {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub set_code: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub is_reserved: bool,
    #[serde(default)]
    pub is_promo: bool,
}

impl CardRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

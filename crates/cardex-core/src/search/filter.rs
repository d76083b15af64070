use crate::models::CardRecord;

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Set(String),
    Color(String),
    Type(String),
    Subtype(String),
    ColorIdentity(Vec<String>),
    Rarity(String),
    /// `None` when the filter value is not a number; such a predicate never passes.
    ManaValue(Option<f64>),
    MinManaValue(Option<f64>),
    MaxManaValue(Option<f64>),
    Reserved,
    Promo,
}

/// Conjunction of attribute predicates evaluated against a fetched record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    predicates: Vec<Predicate>,
}

impl RecordFilter {
    /// Builds a filter from `(key, value)` pairs. Unknown keys are ignored, as
    /// are flag keys whose value is not `true`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let predicates = pairs
            .into_iter()
            .filter_map(|(key, value)| parse_predicate(key.as_ref(), value.as_ref()))
            .collect();
        Self { predicates }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn matches(&self, record: &CardRecord) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }
}

fn parse_predicate(key: &str, value: &str) -> Option<Predicate> {
    let value = value.trim();
    let predicate = match key.trim() {
        "set" => Predicate::Set(value.to_string()),
        "color" => Predicate::Color(value.to_string()),
        "type" => Predicate::Type(value.to_string()),
        "subtype" => Predicate::Subtype(value.to_string()),
        "color_identity" => Predicate::ColorIdentity(parse_color_list(value)),
        "rarity" => Predicate::Rarity(value.to_string()),
        "mana_value" => Predicate::ManaValue(parse_number(value)),
        "min_mana_value" => Predicate::MinManaValue(parse_number(value)),
        "max_mana_value" => Predicate::MaxManaValue(parse_number(value)),
        "is_reserved" if is_true(value) => Predicate::Reserved,
        "is_promo" if is_true(value) => Predicate::Promo,
        _ => return None,
    };
    Some(predicate)
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Accepts `W,U`, `W U` and the compact `WU` form.
fn parse_color_list(value: &str) -> Vec<String> {
    value
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .flat_map(|token| token.chars().map(String::from).collect::<Vec<_>>())
        .collect()
}

fn contains_ignore_case(values: &[String], wanted: &str) -> bool {
    let wanted = wanted.to_lowercase();
    values.iter().any(|value| value.to_lowercase() == wanted)
}

impl Predicate {
    /// `mana_value` is an exact `==` on the parsed numbers. Mana values are
    /// integers or halves, which `f64` holds exactly.
    #[allow(clippy::float_cmp, reason = "exact equality is the filter's contract")]
    fn matches(&self, record: &CardRecord) -> bool {
        match self {
            Self::Set(set) => !record.set_code.is_empty() && record.set_code == *set,
            Self::Color(color) => record.colors.iter().any(|value| value == color),
            Self::Type(wanted) => contains_ignore_case(&record.types, wanted),
            Self::Subtype(wanted) => contains_ignore_case(&record.subtypes, wanted),
            Self::ColorIdentity(allowed) => record
                .color_identity
                .iter()
                .all(|color| allowed.contains(color)),
            Self::Rarity(rarity) => record.rarity.as_deref() == Some(rarity.as_str()),
            Self::ManaValue(wanted) => {
                matches!((record.mana_value, wanted), (Some(actual), Some(wanted)) if actual == *wanted)
            }
            Self::MinManaValue(bound) => {
                matches!((record.mana_value, bound), (Some(actual), Some(bound)) if actual >= *bound)
            }
            Self::MaxManaValue(bound) => {
                matches!((record.mana_value, bound), (Some(actual), Some(bound)) if actual <= *bound)
            }
            Self::Reserved => record.is_reserved,
            Self::Promo => record.is_promo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> CardRecord {
        CardRecord {
            set_code: "LEA".to_string(),
            colors: vec!["R".to_string()],
            color_identity: vec!["R".to_string()],
            types: vec!["Instant".to_string()],
            rarity: Some("common".to_string()),
            mana_value: Some(1.0),
            ..CardRecord::new("1", "Lightning Bolt")
        }
    }

    #[test]
    fn empty_filter_is_vacuously_satisfied() {
        let filter = RecordFilter::from_pairs(Vec::<(String, String)>::new());
        assert!(filter.is_empty());
        assert!(filter.matches(&CardRecord::new("x", "Anything")));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filter = RecordFilter::from_pairs([("artist", "Christopher Rush")]);
        assert!(filter.is_empty());
    }

    #[test]
    fn all_predicates_must_pass() {
        let record = bolt();
        assert!(RecordFilter::from_pairs([("set", "LEA"), ("color", "R")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("set", "LEA"), ("color", "U")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("set", "lea")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("rarity", "rare")]).matches(&record));
    }

    #[test]
    fn type_matching_ignores_case() {
        let record = bolt();
        assert!(RecordFilter::from_pairs([("type", "instant")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("subtype", "goblin")]).matches(&record));
    }

    #[test]
    fn mana_value_bounds_are_inclusive() {
        let record = bolt();
        assert!(RecordFilter::from_pairs([("mana_value", "1")]).matches(&record));
        assert!(RecordFilter::from_pairs([("min_mana_value", "1"), ("max_mana_value", "1")])
            .matches(&record));
        assert!(!RecordFilter::from_pairs([("min_mana_value", "2")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("max_mana_value", "abc")]).matches(&record));
    }

    #[test]
    fn mana_value_matches_exactly() {
        let half = CardRecord {
            mana_value: Some(0.5),
            ..bolt()
        };
        assert!(RecordFilter::from_pairs([("mana_value", "0.5")]).matches(&half));
        assert!(RecordFilter::from_pairs([("mana_value", "1.0")]).matches(&bolt()));

        let tiny = CardRecord {
            mana_value: Some(1e-20),
            ..bolt()
        };
        assert!(!RecordFilter::from_pairs([("mana_value", "0")]).matches(&tiny));
    }

    #[test]
    fn absent_attribute_fails_targeting_predicate() {
        let sparse = CardRecord::new("2", "Mystery");
        assert!(!RecordFilter::from_pairs([("set", "")]).matches(&sparse));
        assert!(!RecordFilter::from_pairs([("rarity", "common")]).matches(&sparse));
        assert!(!RecordFilter::from_pairs([("min_mana_value", "0")]).matches(&sparse));
        assert!(!RecordFilter::from_pairs([("color", "R")]).matches(&sparse));
    }

    #[test]
    fn color_identity_is_a_subset_check() {
        let mut record = bolt();
        record.color_identity = vec!["R".to_string(), "W".to_string()];
        assert!(RecordFilter::from_pairs([("color_identity", "RWU")]).matches(&record));
        assert!(RecordFilter::from_pairs([("color_identity", "R, W")]).matches(&record));
        assert!(!RecordFilter::from_pairs([("color_identity", "R")]).matches(&record));
    }

    #[test]
    fn flags_apply_only_for_true_value() {
        let mut record = bolt();
        assert!(!RecordFilter::from_pairs([("is_reserved", "true")]).matches(&record));
        assert!(RecordFilter::from_pairs([("is_reserved", "false")]).matches(&record));
        record.is_promo = true;
        assert!(RecordFilter::from_pairs([("is_promo", "TRUE")]).matches(&record));
    }
}

use std::path::PathBuf;

use cardex_core::IndexKind;
use clap::Args;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON Lines file with one card record per line.
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    /// Maximum number of hits (defaults to the configured limit).
    #[arg(long)]
    pub limit: Option<usize>,
    /// Attribute filter, repeatable: set, color, type, subtype, color_identity,
    /// rarity, mana_value, min_mana_value, max_mana_value, is_reserved, is_promo.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter_pair)]
    pub filters: Vec<(String, String)>,
    /// Print the strategies run and candidate count along with the hits.
    #[arg(long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Debug, Args)]
pub struct AutocompleteArgs {
    #[arg(allow_hyphen_values = true)]
    pub prefix: String,
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Count orphaned postings without removing them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Repair a single index kind (exact-name, word, prefix, ngram).
    #[arg(long)]
    pub kind: Option<IndexKind>,
}

#[derive(Debug, Args)]
pub struct SimilarArgs {
    /// Similarity in [0, 1]; defaults to the configured threshold.
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Args)]
pub struct SimilarNamesArgs {
    #[arg(allow_hyphen_values = true)]
    pub name: String,
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

pub(super) fn parse_filter_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key must not be empty in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

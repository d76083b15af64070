use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;

#[cfg(test)]
mod tests;

pub use args::{
    AutocompleteArgs, IdArg, ImportArgs, RepairArgs, SearchArgs, SimilarArgs, SimilarNamesArgs,
};

#[derive(Debug, Parser)]
#[command(name = "cardex")]
#[command(about = "Card catalog search index", version)]
pub struct Cli {
    #[arg(long, global = true, default_value = ".cardex")]
    pub root: PathBuf,

    /// Diagnostic level written to stderr; `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Init,
    /// Store and index every card in a JSON Lines file.
    Import(ImportArgs),
    Get(IdArg),
    /// Delete a stored card; its postings are dropped by the next repair.
    Rm(IdArg),
    Search(SearchArgs),
    Autocomplete(AutocompleteArgs),
    /// List indexed prefix keys starting with the given text.
    Prefixes(AutocompleteArgs),
    /// Re-derive every index from the stored cards.
    Rebuild,
    /// Remove postings that reference deleted cards.
    Repair(RepairArgs),
    /// Report clusters of near-duplicate card names.
    Similar(SimilarArgs),
    /// Names sharing a word or trigram with one card name.
    SimilarNames(SimilarNamesArgs),
    Stats,
}

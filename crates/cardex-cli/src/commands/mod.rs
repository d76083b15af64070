use std::path::Path;

use anyhow::{Context, Result};
use cardex_core::CardIndex;
use cardex_core::models::{RepairOptions, SearchRequest};

use crate::cli::Commands;

mod import;
mod support;

use self::import::import_jsonl;
use self::support::print_json;

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    let index = CardIndex::open(root)
        .with_context(|| format!("failed to open card index at {}", root.display()))?;
    run_with_index(&index, root, command)
}

fn run_with_index(index: &CardIndex, root: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            print_json(&serde_json::json!({
                "status": "ok",
                "root": root.display().to_string(),
                "backend": index.store().backend_name(),
            }))?;
        }
        Commands::Import(args) => {
            let report = import_jsonl(index, &args.path)?;
            print_json(&report)?;
        }
        Commands::Get(args) => {
            print_json(&index.require_record(&args.id)?)?;
        }
        Commands::Rm(args) => {
            let removed = index.remove_record(&args.id)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "id": args.id,
                "removed": removed,
            }))?;
        }
        Commands::Search(args) => {
            let request = SearchRequest {
                query: args.query,
                max_results: args.limit,
                filters: args.filters,
            };
            if args.explain {
                print_json(&index.search_with_outcome(&request)?)?;
            } else {
                print_json(&index.search(&request)?)?;
            }
        }
        Commands::Autocomplete(args) => {
            let names = index.autocomplete(&args.prefix, args.limit)?;
            print_json(&names)?;
        }
        Commands::Prefixes(args) => {
            print_json(&index.autocomplete_prefixes(&args.prefix, args.limit)?)?;
        }
        Commands::Rebuild => {
            print_json(&index.rebuild_indexes()?)?;
        }
        Commands::Repair(args) => {
            let options = RepairOptions {
                dry_run: args.dry_run,
                max_orphan_sample: index.config().maintenance.orphan_sample,
            };
            match args.kind {
                Some(kind) => print_json(&index.repair_kind(kind, &options)?)?,
                None => print_json(&index.repair_all_with_options(&options)?)?,
            }
        }
        Commands::Similar(args) => {
            print_json(&index.find_similar(args.threshold)?)?;
        }
        Commands::SimilarNames(args) => {
            print_json(&index.similar_names(&args.name, args.limit)?)?;
        }
        Commands::Stats => {
            print_json(&index.stats()?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;

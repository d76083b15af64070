use super::*;
use cardex_core::IndexKind;
use clap::Parser;

#[test]
fn search_parses_repeated_filters_and_limit() {
    let cli = Cli::try_parse_from([
        "cardex",
        "search",
        "lightning",
        "--limit",
        "5",
        "--filter",
        "set=LEA",
        "--filter",
        "color = R",
    ])
    .expect("parse");
    match cli.command {
        Commands::Search(SearchArgs {
            query,
            limit,
            filters,
            explain,
        }) => {
            assert_eq!(query, "lightning");
            assert_eq!(limit, Some(5));
            assert_eq!(
                filters,
                vec![
                    ("set".to_string(), "LEA".to_string()),
                    ("color".to_string(), "R".to_string()),
                ]
            );
            assert!(!explain);
        }
        _ => panic!("expected search command"),
    }
}

#[test]
fn malformed_filter_is_rejected() {
    assert!(Cli::try_parse_from(["cardex", "search", "bolt", "--filter", "set"]).is_err());
    assert!(Cli::try_parse_from(["cardex", "search", "bolt", "--filter", "=LEA"]).is_err());
}

#[test]
fn root_and_log_level_have_defaults() {
    let cli = Cli::try_parse_from(["cardex", "stats"]).expect("parse");
    assert_eq!(cli.root, PathBuf::from(".cardex"));
    assert_eq!(cli.log_level, "warn");
    assert!(matches!(cli.command, Commands::Stats));
}

#[test]
fn repair_parses_dry_run_and_kind() {
    let cli = Cli::try_parse_from(["cardex", "repair", "--dry-run", "--kind", "ngram"])
        .expect("parse");
    match cli.command {
        Commands::Repair(RepairArgs { dry_run, kind }) => {
            assert!(dry_run);
            assert_eq!(kind, Some(IndexKind::Ngram));
        }
        _ => panic!("expected repair command"),
    }
    assert!(Cli::try_parse_from(["cardex", "repair", "--kind", "metaphone"]).is_err());
}

#[test]
fn similar_threshold_is_optional() {
    let cli = Cli::try_parse_from(["cardex", "--root", "/tmp/x", "similar"]).expect("parse");
    match cli.command {
        Commands::Similar(SimilarArgs { threshold }) => assert_eq!(threshold, None),
        _ => panic!("expected similar command"),
    }
    assert_eq!(cli.root, PathBuf::from("/tmp/x"));
}

#[test]
fn similar_names_and_prefixes_take_text_and_limit() {
    let cli = Cli::try_parse_from(["cardex", "similar-names", "Lightning Bolt", "--limit", "3"])
        .expect("parse");
    match cli.command {
        Commands::SimilarNames(SimilarNamesArgs { name, limit }) => {
            assert_eq!(name, "Lightning Bolt");
            assert_eq!(limit, 3);
        }
        _ => panic!("expected similar-names command"),
    }

    let cli = Cli::try_parse_from(["cardex", "prefixes", "bol"]).expect("parse");
    match cli.command {
        Commands::Prefixes(AutocompleteArgs { prefix, limit }) => {
            assert_eq!(prefix, "bol");
            assert_eq!(limit, 10);
        }
        _ => panic!("expected prefixes command"),
    }
}

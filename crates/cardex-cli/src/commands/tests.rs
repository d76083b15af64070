use std::fs;

use cardex_core::models::SearchRequest;
use cardex_core::{CardIndex, CardexError};
use tempfile::tempdir;

use super::import::{ImportReport, import_jsonl};
use super::run_with_index;
use crate::cli::{Commands, IdArg};

#[test]
fn import_counts_skipped_and_rejected_lines() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("cards.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"uuid\":\"1\",\"name\":\"Lightning Bolt\",\"set_code\":\"LEA\"}\n",
            "not json\n",
            "{\"uuid\":\"2\",\"name\":\"  \"}\n",
            "{\"uuid\":\"3\",\"name\":\"Opt\"}\n",
        ),
    )
    .expect("write fixture");

    let index = CardIndex::in_memory();
    let report = import_jsonl(&index, &path).expect("import");
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped_lines, 1);
    assert_eq!(
        report.skipped_sample.iter().map(|r| r.line).collect::<Vec<_>>(),
        vec![2]
    );
    assert_eq!(report.rejected, 1);
    assert!(report.postings_added > 0);

    let hits = index.search(&SearchRequest::new("opt")).expect("search");
    assert_eq!(hits[0].id, "3");
}

#[test]
fn import_fails_when_every_line_is_invalid() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("cards.jsonl");
    fs::write(&path, "nope\nstill nope\n").expect("write fixture");

    let err = import_jsonl(&CardIndex::in_memory(), &path).expect_err("all invalid");
    assert!(format!("{err:#}").contains("2 invalid lines"));
}

#[test]
fn import_of_empty_file_is_a_no_op() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("cards.jsonl");
    fs::write(&path, "\n").expect("write fixture");
    let report = import_jsonl(&CardIndex::in_memory(), &path).expect("import");
    assert_eq!(report, ImportReport::default());
}

#[test]
fn get_of_unknown_id_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let err = run_with_index(
        &CardIndex::in_memory(),
        temp.path(),
        Commands::Get(IdArg {
            id: "missing".to_string(),
        }),
    )
    .expect_err("missing record");
    let not_found = err
        .downcast_ref::<CardexError>()
        .expect("core error reaches the process boundary");
    assert_eq!(not_found.code(), "NOT_FOUND");
    assert!(err.to_string().contains("record missing"));
}

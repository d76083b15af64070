use crate::config::IndexingConfig;
use crate::models::{CardRecord, RepairOptions};
use crate::namespace::{IndexKind, IndexNamespace};
use crate::store::{MemoryRecordStore, RecordStore};

use super::{IndexBuilder, IndexMaintainer};

fn store_record(store: &MemoryRecordStore, ns: &IndexNamespace, record: &CardRecord) {
    store
        .set(
            &ns.record_key(&record.id),
            &serde_json::to_string(record).expect("encode"),
        )
        .expect("set record");
}

fn fixture() -> (MemoryRecordStore, IndexNamespace, IndexBuilder<MemoryRecordStore>) {
    let store = MemoryRecordStore::new();
    let ns = IndexNamespace::default();
    let builder = IndexBuilder::new(store.clone(), ns.clone(), IndexingConfig::default());
    (store, ns, builder)
}

fn index_keys(store: &MemoryRecordStore, ns: &IndexNamespace) -> Vec<String> {
    IndexKind::ALL
        .iter()
        .flat_map(|kind| {
            store
                .scan_prefix(&ns.index_prefix(*kind), 7)
                .collect::<crate::Result<Vec<_>>>()
                .expect("scan")
        })
        .collect()
}

#[test]
fn index_record_posts_every_kind() {
    let (store, _, builder) = fixture();
    let added = builder
        .index_record(&CardRecord::new("1", "Lightning Bolt"))
        .expect("index");

    assert_eq!(added.exact_name, 1);
    assert_eq!(added.word, 2);
    assert_eq!(added.ngram, 12);
    assert!(added.prefix > 0);
    assert_eq!(
        store.members("exact-name:lightning bolt").expect("exact"),
        vec!["1"]
    );
    assert_eq!(store.members("word:bolt").expect("word"), vec!["1"]);
    assert_eq!(store.members("prefix:lightning bolt").expect("prefix"), vec!["1"]);
    assert_eq!(store.members("prefix:bo").expect("word prefix"), vec!["1"]);
    assert_eq!(store.members("ngram:bol").expect("ngram"), vec!["1"]);
}

#[test]
fn reindexing_same_record_adds_no_postings() {
    let (store, ns, builder) = fixture();
    let record = CardRecord::new("1", "Llanowar Elves");
    let first = builder.index_record(&record).expect("first");
    let before = index_keys(&store, &ns)
        .iter()
        .map(|key| store.cardinality(key).expect("cardinality"))
        .collect::<Vec<_>>();

    let second = builder.index_record(&record).expect("second");
    let after = index_keys(&store, &ns)
        .iter()
        .map(|key| store.cardinality(key).expect("cardinality"))
        .collect::<Vec<_>>();

    assert!(first.total() > 0);
    assert_eq!(second.total(), 0);
    assert_eq!(before, after);
}

#[test]
fn index_record_rejects_blank_name() {
    let (_, _, builder) = fixture();
    let err = builder
        .index_record(&CardRecord::new("1", "   "))
        .expect_err("blank name");
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[test]
fn rebuild_indexes_stored_records_and_skips_undecodable_ones() {
    let (store, ns, builder) = fixture();
    store_record(&store, &ns, &CardRecord::new("1", "Lightning Bolt"));
    store_record(&store, &ns, &CardRecord::new("2", "Lightning Helix"));
    store.set(&ns.record_key("3"), "not json").expect("set garbage");

    let report = builder.rebuild().expect("rebuild");
    assert_eq!(report.records_indexed, 2);
    assert_eq!(report.records_skipped, 1);
    assert!(report.postings_added > 0);
    assert_eq!(store.members("word:lightning").expect("word"), vec!["1", "2"]);

    let again = builder.rebuild().expect("rebuild again");
    assert_eq!(again.postings_added, 0);
}

#[test]
fn repair_all_removes_orphans_and_empty_keys() {
    let (store, ns, builder) = fixture();
    for record in [
        CardRecord::new("1", "Lightning Bolt"),
        CardRecord::new("2", "Lightning Helix"),
    ] {
        store_record(&store, &ns, &record);
        builder.index_record(&record).expect("index");
    }
    store.remove(&ns.record_key("2")).expect("delete record 2");

    let maintainer = IndexMaintainer::new(store.clone(), ns.clone(), IndexingConfig::default());
    let report = maintainer.repair_all().expect("repair");

    assert!(!report.dry_run);
    assert_eq!(report.kinds.len(), 4);
    assert!(report.orphaned_refs_removed > 0);
    assert!(report.removed_empty_indexes > 0);
    assert_eq!(report.orphan_ids_sample, vec!["2"]);
    assert_eq!(store.members("word:lightning").expect("word"), vec!["1"]);
    assert!(!store.exists("word:helix").expect("helix key"));
    assert!(!store.exists("exact-name:lightning helix").expect("exact key"));
    for key in index_keys(&store, &ns) {
        let members = store.members(&key).expect("members");
        assert!(!members.is_empty(), "empty key {key} left behind");
        assert!(!members.contains(&"2".to_string()), "orphan left under {key}");
    }

    let second = maintainer.repair_all().expect("repair again");
    assert_eq!(second.orphaned_refs_removed, 0);
    assert_eq!(second.removed_empty_indexes, 0);
}

#[test]
fn dry_run_counts_without_mutating() {
    let (store, ns, builder) = fixture();
    builder
        .index_record(&CardRecord::new("gone", "Black Lotus"))
        .expect("index");

    let maintainer = IndexMaintainer::new(store.clone(), ns.clone(), IndexingConfig::default());
    let options = RepairOptions {
        dry_run: true,
        ..RepairOptions::default()
    };
    let report = maintainer
        .repair_with_options(IndexKind::Word, &options)
        .expect("dry run");

    assert_eq!(report.kind, IndexKind::Word);
    assert_eq!(report.keys_scanned, 2);
    assert_eq!(report.orphaned_refs_removed, 2);
    assert_eq!(report.removed_empty_indexes, 2);
    assert_eq!(store.members("word:lotus").expect("untouched"), vec!["gone"]);
}

#[test]
fn repair_keeps_members_whose_record_exists() {
    let (store, ns, _) = fixture();
    store.add_member("word:bolt", "live").expect("add live");
    store.add_member("word:bolt", "dead").expect("add dead");
    store_record(&store, &ns, &CardRecord::new("live", "Bolt"));

    let maintainer = IndexMaintainer::new(store.clone(), ns, IndexingConfig::default());
    let report = maintainer.repair(IndexKind::Word).expect("repair");

    assert_eq!(report.orphaned_refs_removed, 1);
    assert_eq!(report.removed_empty_indexes, 0);
    assert_eq!(store.members("word:bolt").expect("members"), vec!["live"]);
}

#[test]
fn repair_respects_namespace_root() {
    let store = MemoryRecordStore::new();
    let ns = IndexNamespace::with_root("mtg");
    store.add_member("word:bolt", "x").expect("foreign key");
    store.add_member("mtg:word:bolt", "x").expect("namespaced key");

    let maintainer = IndexMaintainer::new(store.clone(), ns, IndexingConfig::default());
    let report = maintainer.repair(IndexKind::Word).expect("repair");

    assert_eq!(report.keys_scanned, 1);
    assert!(!store.exists("mtg:word:bolt").expect("namespaced"));
    assert!(store.exists("word:bolt").expect("foreign key untouched"));
}

#[test]
fn orphan_sample_is_capped() {
    let (store, ns, builder) = fixture();
    for id in ["a", "b", "c"] {
        builder
            .index_record(&CardRecord::new(id, "Shock"))
            .expect("index");
    }
    let maintainer = IndexMaintainer::new(store, ns, IndexingConfig::default());
    let report = maintainer
        .repair_all_with_options(&RepairOptions {
            dry_run: false,
            max_orphan_sample: 2,
        })
        .expect("repair");
    assert_eq!(report.orphan_ids_sample, vec!["a", "b"]);
}

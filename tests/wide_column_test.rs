//! The six literal end-to-end scenarios from the wide-column data model
//! specification, exercised against the public `Database` facade with a
//! `FixedClock` so every timestamp in the scenario is explicit.

use std::collections::HashMap;
use std::sync::Arc;

use wide_column_store::{Database, DatabaseOptions, FixedClock, PutItem, SeparatorKeyCodec, Utf8ValueSerializer};

const T: u64 = 1_000_000_000_000;

fn open_db(dir: &tempfile::TempDir, datasets: &[&str]) -> Database<SeparatorKeyCodec, Utf8ValueSerializer> {
    Database::open_with_clock(
        dir.path(),
        datasets.iter().map(|s| s.to_string()),
        SeparatorKeyCodec,
        Utf8ValueSerializer,
        DatabaseOptions::default(),
        Arc::new(FixedClock::new(T)),
    )
    .unwrap()
}

#[test]
fn put_get_latest() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &[]);

    db.put_row(
        "u:1",
        vec![PutItem::new("email", "a@x".to_string(), Some(T))],
        None,
    )
    .unwrap();

    let got = db.get_row("u:1", None::<&str>, 1, None, None, None).unwrap();
    assert_eq!(got, HashMap::from([("email".to_string(), vec![(T, "a@x".to_string())])]));
}

#[test]
fn version_history() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &[]);

    db.put_row(
        "p:abc",
        vec![
            PutItem::new("price", "19".to_string(), Some(T - 1000)),
            PutItem::new("price", "21".to_string(), Some(T)),
        ],
        None,
    )
    .unwrap();

    let got = db.get_row("p:abc", Some("price"), 2, None, None, None).unwrap();
    assert_eq!(
        got["price"],
        vec![(T, "21".to_string()), (T - 1000, "19".to_string())]
    );
}

#[test]
fn dataset_isolation() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &["A", "B"]);

    db.put_row("k", vec![PutItem::new("c", "v1".to_string(), Some(T))], Some("A"))
        .unwrap();
    db.put_row("k", vec![PutItem::new("c", "v2".to_string(), Some(T))], Some("B"))
        .unwrap();

    let a = db.get_row("k", None::<&str>, 1, None, None, Some("A")).unwrap();
    let b = db.get_row("k", None::<&str>, 1, None, None, Some("B")).unwrap();
    assert_eq!(a["c"], vec![(T, "v1".to_string())]);
    assert_eq!(b["c"], vec![(T, "v2".to_string())]);
}

#[test]
fn time_range_filter() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &[]);

    db.put_row(
        "log",
        vec![
            PutItem::new("event", "e1".to_string(), Some(T - 20_000)),
            PutItem::new("event", "e2".to_string(), Some(T - 15_000)),
            PutItem::new("event", "e3".to_string(), Some(T - 10_000)),
            PutItem::new("event", "e4".to_string(), Some(T - 5_000)),
        ],
        None,
    )
    .unwrap();

    let got = db
        .get_row(
            "log",
            Some("event"),
            10,
            Some(T - 16_000),
            Some(T - 9_000),
            None,
        )
        .unwrap();
    assert_eq!(
        got["event"],
        vec![(T - 10_000, "e3".to_string()), (T - 15_000, "e2".to_string())]
    );
}

#[test]
fn point_version_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &[]);

    db.put_row(
        "s",
        vec![
            PutItem::new("reading", "r1".to_string(), Some(T - 200)),
            PutItem::new("reading", "r2".to_string(), Some(T - 100)),
            PutItem::new("reading", "r3".to_string(), Some(T)),
        ],
        None,
    )
    .unwrap();

    db.delete_row("s", Some("reading"), Some(vec![T - 100]), None)
        .unwrap();

    let got = db.get_row("s", Some("reading"), 3, None, None, None).unwrap();
    assert_eq!(
        got["reading"],
        vec![(T, "r3".to_string()), (T - 200, "r1".to_string())]
    );
}

#[test]
fn row_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir, &[]);

    db.put_row(
        "u:1",
        vec![PutItem::new("email", "a@x".to_string(), Some(T))],
        None,
    )
    .unwrap();
    db.delete_row("u:1", None::<&str>, None, None).unwrap();

    let got = db.get_row("u:1", None::<&str>, 1, None, None, None).unwrap();
    assert!(got.is_empty());
}

// ABOUTME: Integration tests for export followed by import
// ABOUTME: Runs the full workflow against the in-memory table store

use std::collections::HashMap;
use std::io::Write;

use aws_sdk_dynamodb::types::AttributeValue;
use dynamodb_migrator::commands::{self, ImportOutcome, RunOutcome};
use dynamodb_migrator::config::MigratorConfig;
use dynamodb_migrator::error::MigratorError;
use dynamodb_migrator::interactive::{AssumeYes, Confirmer};
use dynamodb_migrator::store::{InMemoryStore, RawItem, TableStore};

struct Decline;

impl Confirmer for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn n(value: &str) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn raw(pairs: Vec<(&str, AttributeValue)>) -> RawItem {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Items compared as a set, independent of storage order
fn as_set(items: Vec<RawItem>) -> Vec<String> {
    let mut rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let mut pairs: Vec<_> = item.iter().map(|(k, v)| format!("{}={:?}", k, v)).collect();
            pairs.sort();
            pairs.join(",")
        })
        .collect();
    rendered.sort();
    rendered
}

async fn orders_store() -> InMemoryStore {
    let store = InMemoryStore::new().with_page_size(2);
    store.create_table("orders", "customer", Some("order_id")).await;

    let items = vec![
        raw(vec![
            ("customer", s("alice")),
            ("order_id", n("1")),
            ("total", n("19.99")),
            ("paid", AttributeValue::Bool(true)),
        ]),
        raw(vec![
            ("customer", s("alice")),
            ("order_id", n("2")),
            ("note", AttributeValue::Null(true)),
        ]),
        raw(vec![
            ("customer", s("bob")),
            ("order_id", n("1")),
            (
                "lines",
                AttributeValue::L(vec![AttributeValue::M(HashMap::from([
                    ("sku".to_string(), s("X-1")),
                    ("qty".to_string(), n("3")),
                ]))]),
            ),
        ]),
        raw(vec![("customer", s("carol")), ("order_id", n("7"))]),
        raw(vec![
            ("customer", s("dave")),
            ("order_id", n("-4")),
            ("tags", AttributeValue::L(vec![s("a"), s("")])),
        ]),
    ];
    for item in items {
        store.put_item("orders", item).await.unwrap();
    }
    store
}

fn write_export(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_concrete_foo_scenario() {
    let source = InMemoryStore::new();
    source.create_table("foo", "id", None).await;
    source
        .put_item("foo", raw(vec![("id", s("a")), ("v", n("1"))]))
        .await
        .unwrap();
    source
        .put_item("foo", raw(vec![("id", s("b")), ("v", n("2"))]))
        .await
        .unwrap();

    let json = commands::export(&source, "foo").await.unwrap();
    assert_eq!(
        json,
        r#"{"TableName":"foo","PrimaryKey":"id","RangeKey":"","Items":[{"id":"a","v":1},{"id":"b","v":2}]}"#
    );

    let file = write_export(&json);
    let target = InMemoryStore::new();
    target.create_table("foo", "id", None).await;

    let config = MigratorConfig::new("foo").with_import_path(file.path());
    let outcome = commands::run(&config, &target, &AssumeYes).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Imported(ImportOutcome::Completed { written: 2 })
    );
    assert_eq!(as_set(target.items("foo").await), as_set(source.items("foo").await));
}

#[tokio::test]
async fn test_round_trip_reproduces_item_set() {
    let source = orders_store().await;

    let json = commands::export(&source, "orders").await.unwrap();
    let file = write_export(&json);

    let target = InMemoryStore::new();
    target.create_table("orders_copy", "customer", Some("order_id")).await;
    commands::import(&target, &AssumeYes, "orders_copy", file.path())
        .await
        .unwrap();

    assert_eq!(
        as_set(target.items("orders_copy").await),
        as_set(source.items("orders").await)
    );
}

#[tokio::test]
async fn test_import_twice_is_idempotent() {
    let source = orders_store().await;
    let json = commands::export(&source, "orders").await.unwrap();
    let file = write_export(&json);

    let target = InMemoryStore::new();
    target.create_table("orders", "customer", Some("order_id")).await;

    commands::import(&target, &AssumeYes, "orders", file.path())
        .await
        .unwrap();
    let once = as_set(target.items("orders").await);

    commands::import(&target, &AssumeYes, "orders", file.path())
        .await
        .unwrap();
    let twice = as_set(target.items("orders").await);

    assert_eq!(once, twice);
    assert_eq!(target.item_count("orders").await, 5);
}

#[tokio::test]
async fn test_declined_import_leaves_table_unchanged() {
    let source = orders_store().await;
    let json = commands::export(&source, "orders").await.unwrap();
    let file = write_export(&json);

    let target = InMemoryStore::new();
    target.create_table("orders", "customer", Some("order_id")).await;
    target
        .put_item(
            "orders",
            raw(vec![("customer", s("zed")), ("order_id", n("9"))]),
        )
        .await
        .unwrap();
    let writes_before = target.writes();

    let outcome = commands::import(&target, &Decline, "orders", file.path())
        .await
        .unwrap();

    assert_eq!(outcome, ImportOutcome::Declined);
    assert_eq!(target.item_count("orders").await, 1);
    assert_eq!(target.writes(), writes_before);
}

#[tokio::test]
async fn test_export_schema_fields() {
    let store = orders_store().await;
    let document = commands::export_table(&store, "orders").await.unwrap();
    assert_eq!(document.table_name, "orders");
    assert_eq!(document.primary_key, "customer");
    assert_eq!(document.range_key, "order_id");
    assert_eq!(document.items.len(), 5);

    store.create_table("plain", "id", None).await;
    let document = commands::export_table(&store, "plain").await.unwrap();
    assert_eq!(document.primary_key, "id");
    assert_eq!(document.range_key, "");
}

#[tokio::test]
async fn test_scan_failure_produces_no_document() {
    let store = orders_store().await.with_scan_failure_at_page(3);

    let config = MigratorConfig::new("orders");
    let err = commands::run(&config, &store, &AssumeYes).await.unwrap_err();

    assert!(matches!(err, MigratorError::Scan { page: 3, .. }));
}

#[tokio::test]
async fn test_partial_import_keeps_earlier_writes() {
    let json = r#"{
        "TableName": "foo",
        "PrimaryKey": "id",
        "RangeKey": "",
        "Items": [{"id": "a"}, {"id": "b"}, {"name": "no key"}, {"id": "d"}]
    }"#;
    let file = write_export(json);

    let target = InMemoryStore::new();
    target.create_table("foo", "id", None).await;

    let err = commands::import(&target, &AssumeYes, "foo", file.path())
        .await
        .unwrap_err();

    assert!(matches!(err, MigratorError::Write { position: 3, .. }));
    let ids: Vec<_> = target
        .items("foo")
        .await
        .into_iter()
        .map(|item| item["id"].clone())
        .collect();
    assert_eq!(ids, vec![s("a"), s("b")]);
}

#[tokio::test]
async fn test_import_into_missing_table() {
    let file = write_export(r#"{"Items": [{"id": "a"}]}"#);
    let target = InMemoryStore::new();

    let err = commands::import(&target, &AssumeYes, "nope", file.path())
        .await
        .unwrap_err();

    assert!(matches!(err, MigratorError::Write { position: 1, total: 1, .. }));
}

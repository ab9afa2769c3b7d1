//! Tests for inject module

use super::*;
use crate::pagination::PaginationConfig;
use crate::testing::FakeTransport;
use crate::types::{JsonValue, Method};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn rows_path() -> Vec<String> {
    vec!["rows".to_string()]
}

fn activities() -> Vec<JsonValue> {
    vec![
        json!({"id": 10, "plot": {"id": 1}, "status": "done"}),
        json!({"id": 11, "plot": {"id": 2}, "status": "open"}),
        json!({"id": 12, "status": "orphan"}),
    ]
}

// ============================================================================
// Walk Tests
// ============================================================================

#[test]
fn test_target_records_flatten_lists() {
    let mut payload = json!({
        "rows": [
            {"id": 1, "plots": [{"id": "a"}, {"id": "b"}]},
            {"id": 2, "plots": {"id": "c"}},
            {"id": 3}
        ]
    });
    let path = vec!["rows".to_string(), "plots".to_string()];

    let ids: Vec<JsonValue> = target_records_mut(&mut payload, &path)
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("a"), json!("b"), json!("c")]);
}

#[test]
fn test_target_records_empty_path() {
    let mut list = json!([{"id": 1}, 2, {"id": 3}]);
    assert_eq!(target_records_mut(&mut list, &[]).len(), 2);

    let mut object = json!({"id": 1});
    assert_eq!(target_records_mut(&mut object, &[]).len(), 1);
}

#[test]
fn test_build_lookup_skips_missing_keys() {
    let rows = activities();
    let lookup = build_lookup(&rows, "plot.id");
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup["1"]["id"], json!(10));
}

// ============================================================================
// Attach Tests
// ============================================================================

#[test]
fn test_attach_matches_and_leaves_others() {
    let mut payload = json!({"rows": [{"id": 1}, {"id": 2}, {"id": 3}]});
    let source = InjectionSource::inline(activities())
        .matching("plot.id", "id")
        .attach_as("activity");
    let rows = activities();

    let mut targets = target_records_mut(&mut payload, &rows_path());
    let attached = attach(&mut targets, &source, &rows);

    assert_eq!(attached, 2);
    assert_eq!(payload["rows"][0]["activity"]["id"], json!(10));
    assert_eq!(payload["rows"][1]["activity"]["status"], json!("open"));
    assert_eq!(payload["rows"][2], json!({"id": 3}));
}

#[test]
fn test_attach_empty_lookup_is_noop() {
    let mut payload = json!({"rows": [{"id": 1, "activity": "stale"}]});
    let source = InjectionSource::inline(vec![]).attach_as("activity");

    let mut targets = target_records_mut(&mut payload, &rows_path());
    assert_eq!(attach(&mut targets, &source, &[]), 0);
    assert_eq!(payload, json!({"rows": [{"id": 1, "activity": "stale"}]}));
}

#[test]
fn test_attach_overwrites_stale_value() {
    let mut payload = json!({"rows": [{"id": 1, "activity": "stale"}]});
    let rows = activities();
    let source = InjectionSource::inline(rows.clone())
        .matching("plot.id", "id")
        .attach_as("activity");

    let mut targets = target_records_mut(&mut payload, &rows_path());
    attach(&mut targets, &source, &rows);

    assert_eq!(payload["rows"][0]["activity"], rows[0]);
}

// ============================================================================
// Injector Tests
// ============================================================================

#[tokio::test]
async fn test_inject_is_idempotent() {
    let transport = FakeTransport::new(|_| Ok(json!({})));
    let injector = Injector::new(&transport, PaginationConfig::default());
    let sources = vec![InjectionSource::inline(activities())
        .matching("plot.id", "id")
        .attach_as("activity")];

    let mut payload = json!({"rows": [{"id": 1}, {"id": 2}]});
    injector.inject(&mut payload, &rows_path(), &sources).await.unwrap();
    let once = payload.clone();
    injector.inject(&mut payload, &rows_path(), &sources).await.unwrap();

    assert_eq!(payload, once);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_later_source_wins() {
    let transport = FakeTransport::new(|_| Ok(json!({})));
    let injector = Injector::new(&transport, PaginationConfig::default());
    let sources = vec![
        InjectionSource::inline(vec![json!({"id": 1, "v": "first"})]).attach_as("ctx"),
        InjectionSource::inline(vec![json!({"id": 1, "v": "second"})]).attach_as("ctx"),
    ];

    let mut payload = json!({"rows": [{"id": 1}]});
    let count = injector.inject(&mut payload, &rows_path(), &sources).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(payload["rows"][0]["ctx"]["v"], json!("second"));
}

#[tokio::test]
async fn test_source_without_rows_is_noop() {
    let transport = FakeTransport::new(|_| Ok(json!({})));
    let injector = Injector::new(&transport, PaginationConfig::default());

    let mut payload = json!({"rows": [{"id": 1}]});
    let count = injector
        .inject(&mut payload, &rows_path(), &[InjectionSource::default()])
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert_eq!(payload, json!({"rows": [{"id": 1}]}));
}

#[tokio::test]
async fn test_endpoint_source_is_paginated() {
    let transport = FakeTransport::new(|req| {
        let page = req.page("page").unwrap_or(0);
        Ok(json!({
            "rows": [{"plotId": page + 1, "kind": "survey"}],
            "totalPages": 2
        }))
    });
    let injector = Injector::new(&transport, PaginationConfig::default());
    let mut source = InjectionSource::from_endpoint("/v1/activities/search")
        .matching("plotId", "id")
        .attach_as("survey")
        .with_method(Method::POST);
    source.filters.insert("activityType".to_string(), json!("land_survey"));
    source.filters.insert("unused".to_string(), JsonValue::Null);

    let mut payload = json!({"rows": [{"id": 1}, {"id": 2}, {"id": 3}]});
    let count = injector
        .inject(&mut payload, &rows_path(), &[source])
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(payload["rows"][1]["survey"]["plotId"], json!(2));
    for request in transport.requests() {
        let body = request.body.unwrap();
        assert_eq!(body["activityType"], json!("land_survey"));
        assert!(body.get("unused").is_none());
    }
}

#[tokio::test]
async fn test_file_source() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("activities.json");
    std::fs::write(&path, r#"{"rows": [{"id": 5, "note": "from file"}, 7]}"#).unwrap();

    let transport = FakeTransport::new(|_| Ok(json!({})));
    let injector = Injector::new(&transport, PaginationConfig::default());
    let source = InjectionSource::from_file(&path).attach_as("note");

    let rows = injector.source_rows(&source).await.unwrap();
    assert_eq!(rows, vec![json!({"id": 5, "note": "from file"})]);
}

#[test]
fn test_source_kind_precedence() {
    let mut source = InjectionSource::from_endpoint("/x");
    assert_eq!(source.kind(), SourceRows::Endpoint("/x"));
    source.rows = Some(vec![]);
    assert!(matches!(source.kind(), SourceRows::Inline(_)));
    assert_eq!(InjectionSource::default().kind(), SourceRows::None);
}

#[test]
fn test_source_yaml_defaults() {
    let source: InjectionSource =
        serde_yaml::from_str("endpoint: /v1/activities/search\nattach_as: activity").unwrap();
    assert_eq!(source.method, Method::GET);
    assert_eq!(source.source_key, "id");
    assert_eq!(source.target_key, "id");
    assert_eq!(source.label(), "/v1/activities/search");
}

//! Tests for details module

use super::*;
use crate::error::Error;
use crate::testing::FakeTransport;
use crate::types::{JsonValue, Method};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;

fn ids(n: i64) -> Vec<JsonValue> {
    (1..=n).map(JsonValue::from).collect()
}

/// Echoes one detail row per id found in the request
fn echo_transport() -> FakeTransport {
    FakeTransport::new(|req| {
        let ids: Vec<JsonValue> = match (&req.body, req.query.get("ids")) {
            (_, Some(csv)) => csv.split(',').map(|s| json!(s.parse::<i64>().unwrap())).collect(),
            (Some(body), None) => match body.get("ids") {
                Some(JsonValue::Array(list)) => list.clone(),
                Some(JsonValue::String(csv)) => csv
                    .split(',')
                    .map(|s| json!(s.parse::<i64>().unwrap()))
                    .collect(),
                _ => Vec::new(),
            },
            (None, None) => {
                let id: i64 = req.endpoint.rsplit('/').next().unwrap().parse().unwrap();
                return Ok(json!({"id": id, "detail": true}));
            }
        };
        let rows: Vec<JsonValue> = ids.into_iter().map(|id| json!({"id": id})).collect();
        Ok(json!({"rows": rows}))
    })
    .with_delay(|_| Duration::from_millis(5))
}

// ============================================================================
// DetailConfig Tests
// ============================================================================

#[test]
fn test_detail_config_default() {
    let config = DetailConfig::default();
    assert!(!config.is_enabled());
    assert_eq!(config.placeholder, "{id}");
    assert_eq!(config.method, Method::GET);
    assert_eq!(config.ids_body_key(), "ids");
    assert_eq!(config.effective_batch_size(), 200);
    assert_eq!(config.effective_concurrency(), 8);
}

#[test_case(0, 0, 200, 8 ; "zero falls back")]
#[test_case(-5, -1, 200, 8 ; "negative falls back")]
#[test_case(50, 3, 50, 3 ; "positive kept")]
fn test_effective_sizes(batch: i64, concurrency: i64, want_batch: usize, want_conc: usize) {
    let config = DetailConfig::default()
        .with_batch_size(batch)
        .with_concurrency(concurrency);
    assert_eq!(config.effective_batch_size(), want_batch);
    assert_eq!(config.effective_concurrency(), want_conc);
}

#[test_case("/v1/plots/{id}", DetailMode::Auto, DetailMode::Path ; "placeholder infers path")]
#[test_case("/v1/plots/details", DetailMode::Auto, DetailMode::Batch ; "no placeholder infers batch")]
#[test_case("/v1/plots/{id}", DetailMode::Batch, DetailMode::Batch ; "explicit mode wins")]
fn test_resolved_mode(endpoint: &str, mode: DetailMode, expected: DetailMode) {
    let config = DetailConfig::default().with_endpoint(endpoint).with_mode(mode);
    assert_eq!(config.resolved_mode(), expected);
}

#[test]
fn test_detail_config_yaml() {
    let config: DetailConfig = serde_yaml::from_str(
        "endpoint: /v1/plots/details\nmethod: POST\nids_key: plotIds\nids_as_list: true\nbatch_size: 50",
    )
    .unwrap();
    assert_eq!(config.method, Method::POST);
    assert_eq!(config.ids_body_key(), "plotIds");
    assert!(config.ids_as_list);
    assert_eq!(config.effective_batch_size(), 50);
}

// ============================================================================
// extract_record_ids Tests
// ============================================================================

#[test]
fn test_extract_ids_dedupes_in_order() {
    let rows = vec![
        json!({"id": 3}),
        json!({"id": 1}),
        json!({"id": 3}),
        json!({"name": "no id"}),
        json!({"id": null}),
        json!("not a row"),
        json!({"id": 2}),
    ];
    assert_eq!(
        extract_record_ids(&rows, "id", None),
        vec![json!(3), json!(1), json!(2)]
    );
}

#[test]
fn test_extract_ids_dotted_and_capped() {
    let rows = vec![
        json!({"plot": {"id": "a"}}),
        json!({"plot": {"id": "b"}}),
        json!({"plot": {"id": "c"}}),
    ];
    assert_eq!(
        extract_record_ids(&rows, "plot.id", Some(2)),
        vec![json!("a"), json!("b")]
    );
    assert_eq!(extract_record_ids(&rows, "plot.id", Some(0)).len(), 3);
}

// ============================================================================
// DetailEnricher Tests
// ============================================================================

#[tokio::test]
async fn test_batch_mode_chunks_450_ids() {
    let transport = echo_transport();
    let config = DetailConfig::default()
        .with_endpoint("/v1/plots/details")
        .with_batch_size(200)
        .with_concurrency(2);
    let enricher = DetailEnricher::new(&transport, config);

    let rows = enricher.enrich(&ids(450)).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| r.query["ids"].split(',').count())
        .collect();
    assert_eq!(sizes, vec![200, 200, 50]);
    assert!(transport.peak_in_flight() <= 2);

    // Submission order, not completion order
    let got: Vec<JsonValue> = rows.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(got, ids(450));
}

#[tokio::test]
async fn test_batch_mode_post_csv_body() {
    let transport = echo_transport();
    let mut config = DetailConfig::default()
        .with_endpoint("/v1/plots/details")
        .with_method(Method::POST)
        .with_batch_size(2);
    config.payload.insert("withOwner".to_string(), json!(true));
    let enricher = DetailEnricher::new(&transport, config);

    let rows = enricher.enrich(&ids(3)).await.unwrap();
    assert_eq!(rows.len(), 3);

    let requests = transport.requests();
    assert_eq!(
        requests[0].body,
        Some(json!({"withOwner": true, "ids": "1,2"}))
    );
    assert!(requests[0].query.is_empty());
}

#[tokio::test]
async fn test_batch_mode_ids_as_list() {
    let transport = echo_transport();
    let config = DetailConfig::default()
        .with_endpoint("/v1/plots/details")
        .with_method(Method::POST)
        .with_ids_as_list(true);
    let enricher = DetailEnricher::new(&transport, config);

    enricher.enrich(&ids(3)).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, Some(json!({"ids": [1, 2, 3]})));
}

#[tokio::test]
async fn test_path_mode_one_request_per_id() {
    let transport = echo_transport();
    let config = DetailConfig::default()
        .with_endpoint("/v1/plots/{id}")
        .with_concurrency(3);
    let enricher = DetailEnricher::new(&transport, config);

    let rows = enricher.enrich(&ids(10)).await.unwrap();

    assert_eq!(transport.request_count(), 10);
    assert!(transport.peak_in_flight() <= 3);
    assert_eq!(rows[0], json!({"id": 1, "detail": true}));
    assert_eq!(rows[9], json!({"id": 10, "detail": true}));
}

#[tokio::test]
async fn test_path_mode_rejects_empty_placeholder() {
    let transport = echo_transport();
    let mut config = DetailConfig::default()
        .with_endpoint("/v1/plots/")
        .with_mode(DetailMode::Path);
    config.placeholder = String::new();
    let enricher = DetailEnricher::new(&transport, config);

    let err = enricher.enrich(&ids(2)).await.unwrap_err();

    assert!(matches!(err, Error::InvalidConfigValue { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_normalizes_response_shapes() {
    let transport = FakeTransport::new(|req| {
        Ok(match req.endpoint.as_str() {
            "/d/1" => json!({"items": [{"a": 1}, 5]}),
            "/d/2" => json!([{"b": 2}, "x"]),
            "/d/3" => json!("unexpected"),
            _ => json!({"c": 3}),
        })
    });
    let config = DetailConfig::default().with_endpoint("/d/{id}");
    let enricher = DetailEnricher::new(&transport, config).with_rows_key("items");

    let rows = enricher.enrich(&ids(4)).await.unwrap();
    assert_eq!(
        rows,
        vec![json!({"a": 1}), json!({"b": 2}), json!({"c": 3})]
    );
}

#[tokio::test]
async fn test_enrich_rows_without_endpoint_keeps_rows() {
    let transport = FakeTransport::new(|_| Ok(json!({})));
    let enricher = DetailEnricher::new(&transport, DetailConfig::default());

    let rows = vec![json!({"id": 1}), json!({"id": 2})];
    let result = enricher.enrich_rows(rows.clone()).await.unwrap();

    assert_eq!(result, rows);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_enrich_rows_extracts_ids() {
    let transport = echo_transport();
    let mut config = DetailConfig::default().with_endpoint("/v1/plots/details");
    config.max_ids = Some(2);
    let enricher = DetailEnricher::new(&transport, config);

    let rows = vec![json!({"id": 7}), json!({"id": 7}), json!({"id": 8}), json!({"id": 9})];
    let result = enricher.enrich_rows(rows).await.unwrap();

    assert_eq!(result, vec![json!({"id": 7}), json!({"id": 8})]);
}

#[tokio::test]
async fn test_empty_ids_sends_nothing() {
    let transport = echo_transport();
    let config = DetailConfig::default().with_endpoint("/v1/plots/details");
    let enricher = DetailEnricher::new(&transport, config);

    let rows = enricher.enrich_rows(vec![json!({"name": "no id"})]).await.unwrap();

    assert!(rows.is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_failed_batch_aborts() {
    let transport = FakeTransport::new(|req| {
        if req.query["ids"].starts_with("3") {
            Err(Error::http_status(500, "boom"))
        } else {
            Ok(json!({"rows": []}))
        }
    });
    let config = DetailConfig::default()
        .with_endpoint("/v1/plots/details")
        .with_batch_size(2);
    let enricher = DetailEnricher::new(&transport, config);

    let err = enricher.enrich(&ids(6)).await.unwrap_err();
    assert!(err.is_transport());
}

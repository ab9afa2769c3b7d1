//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML job → HTTP requests → JSON/GeoJSON output

use parcel_sync::engine::{Pipeline, RunConfig};
use parcel_sync::http::{HttpClient, HttpClientConfig, RequestConfig, Transport};
use parcel_sync::loader::load_job_from_str;
use parcel_sync::pagination::{PageFetcher, PaginationConfig};
use parcel_sync::search::{search_resources, SearchConfig};
use parcel_sync::types::{JsonObject, Method};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn job_yaml(base_url: &str, extra: &str) -> String {
    format!(
        "name: plots\nbase_url: {base_url}\nfetch:\n  endpoint: /v1/resources/search\n  resource_id: 7\n{extra}"
    )
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/resources/search"))
        .and(body_partial_json(json!({"resourceId": 7, "page": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"id": 1}, {"id": 2}],
            "totalPages": 2
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/resources/search"))
        .and(body_partial_json(json!({"resourceId": 7, "page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"id": 3}],
            "totalPages": 2
        })))
        .mount(server)
        .await;
}

// ============================================================================
// HTTP Client Integration Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_sends_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/resources"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let job = load_job_from_str(&job_yaml(&mock_server.uri(), "")).unwrap();
    let client = HttpClient::with_config(job.client_config(Some("test-token"))).unwrap();

    let body = client
        .request(Method::GET, "/v1/resources", RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(body, json!({"rows": []}));
}

#[tokio::test]
async fn test_http_client_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/resources"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .build(),
    )
    .unwrap();

    let err = client
        .request(Method::GET, "/v1/resources", RequestConfig::new())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(403));
}

// ============================================================================
// Pagination Integration Tests
// ============================================================================

#[tokio::test]
async fn test_paginated_get_with_query_pages() {
    let mock_server = MockServer::start().await;

    for page in 0..3 {
        Mock::given(method("GET"))
            .and(path("/v1/activities"))
            .and(query_param("page", page.to_string()))
            .and(query_param("status", "verified"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rows": [{"id": page}],
                "totalPages": 3
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .build(),
    )
    .unwrap();
    let mut params = JsonObject::new();
    params.insert("status".to_string(), json!("verified"));

    let rows = PageFetcher::new(&client, PaginationConfig::default())
        .fetch_all("/v1/activities", Method::GET, &JsonObject::new(), &params)
        .await
        .unwrap();

    assert_eq!(rows.total_pages, 3);
    assert_eq!(rows.rows, vec![json!({"id": 0}), json!({"id": 1}), json!({"id": 2})]);
}

// ============================================================================
// Pipeline Integration Tests
// ============================================================================

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server).await;

    for id in 1..=3 {
        let coordinates = if id == 3 {
            json!([])
        } else {
            json!([[[0, 0], [id, 0], [id, id], [0, 0]]])
        };
        Mock::given(method("GET"))
            .and(path(format!("/v1/plots/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "plotName": format!("plot {id}"),
                "polygon": {"type": "Polygon", "coordinates": coordinates}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/v1/activities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"plotId": 2, "status": "surveyed"}],
            "totalPages": 1
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let job = load_job_from_str(&job_yaml(
        &mock_server.uri(),
        concat!(
            "details:\n  endpoint: /v1/plots/{id}\n",
            "inject:\n  sources:\n    - endpoint: /v1/activities/search\n      method: POST\n      source_key: plotId\n      attach_as: activity\n",
            "geojson:\n  properties:\n    - plotName\n    - \"status=activity.status\"\n",
        ),
    ))
    .unwrap();
    let client = HttpClient::with_config(job.client_config(None)).unwrap();
    let geojson_path = dir.path().join("plots.geojson");

    let output = Pipeline::new(&client, &job)
        .with_config(RunConfig::new().with_geojson_output(&geojson_path))
        .run()
        .await
        .unwrap();

    assert_eq!(output.stats.pages_fetched, 2);
    assert_eq!(output.stats.rows_fetched, 3);
    assert_eq!(output.stats.injected, 1);
    assert_eq!(output.stats.features, 2);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&geojson_path).unwrap()).unwrap();
    assert_eq!(written["type"], json!("FeatureCollection"));
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(
        features[0]["properties"],
        json!({"plotID": 1, "plotName": "plot 1", "status": null})
    );
    assert_eq!(
        features[1]["properties"],
        json!({"plotID": 2, "plotName": "plot 2", "status": "surveyed"})
    );
    assert_eq!(features[1]["geometry"]["type"], json!("Polygon"));
}

#[tokio::test]
async fn test_pipeline_transport_error_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/plots/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 0})))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let job = load_job_from_str(&job_yaml(
        &mock_server.uri(),
        "details:\n  endpoint: /v1/plots/{id}\n",
    ))
    .unwrap();
    let client = HttpClient::with_config(job.client_config(None)).unwrap();
    let geojson_path = dir.path().join("plots.geojson");
    let raw_path = dir.path().join("raw.json");

    let err = Pipeline::new(&client, &job)
        .with_config(
            RunConfig::new()
                .with_geojson_output(&geojson_path)
                .with_raw_output(&raw_path),
        )
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!geojson_path.exists());
    assert!(!raw_path.exists());
}

// ============================================================================
// Search Integration Tests
// ============================================================================

#[tokio::test]
async fn test_search_resources() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [
                {"id": 1, "name": "North Basin"},
                {"id": 2, "name": "South Ridge"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .build(),
    )
    .unwrap();

    let hits = search_resources(&client, &SearchConfig::default(), "basin")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, json!(1));
    assert_eq!(hits[0].name, "NORTH BASIN");
}

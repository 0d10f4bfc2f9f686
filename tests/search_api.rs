//! Integration tests for the search endpoint
//!
//! Catalog endpoints are stood in for by a wiremock server; each library
//! domain is served under its own path prefix. Result order depends on which
//! worker finishes first, so assertions compare sets and counts.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use libsearch::config::{ProviderConfig, Settings};
use libsearch::network::HttpClient;
use libsearch::providers::ProviderLoader;
use libsearch::web::{create_router, AppState};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_page(tenant: &str, items: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<script>
window.OverDrive = window.OverDrive || {{}};
window.OverDrive.mediaItems = {items};
window.OverDrive.tenant = '{tenant}';
</script>
</head>
<body><div id="app"></div></body>
</html>"#
    )
}

fn empty_page() -> String {
    "<html><body><p>We couldn't find any matches.</p></body></html>".to_string()
}

/// Build the app against a mock server hosting the given library domains
fn app(server: &MockServer, domains: &[&str]) -> Router {
    let settings = Settings {
        providers: vec![ProviderConfig {
            name: "overdrive".to_string(),
            provider: "overdrive".to_string(),
            url_template: format!("{}/{{domain}}/search", server.uri()),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }],
        ..Default::default()
    };
    let registry = ProviderLoader::load(&settings);
    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    create_router(AppState::new(settings, registry, Arc::new(client)))
}

async fn mount_page(server: &MockServer, domain: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/search", domain)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn libraries(body: &Value) -> HashSet<String> {
    body["Overdrive"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["library"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_dune_scenario() {
    let server = MockServer::start().await;
    let dune = r#"{"title":"Dune"}"#;
    mount_page(&server, "d1", empty_page()).await;
    mount_page(&server, "d2", empty_page()).await;
    mount_page(&server, "d3", catalog_page("lib3", dune)).await;
    mount_page(&server, "d4", catalog_page("lib4", dune)).await;
    mount_page(&server, "d5", catalog_page("lib5", dune)).await;

    let app = app(&server, &["d1", "d2", "d3", "d4", "d5"]);
    let (status, headers, body) = get(app, "/?query=dune").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");

    let body: Value = serde_json::from_slice(&body).unwrap();
    let records = body["Overdrive"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["data"] == json!({"title": "Dune"})));
    assert_eq!(
        libraries(&body),
        HashSet::from(["lib3".to_string(), "lib4".to_string(), "lib5".to_string()])
    );
    assert!(body.get("CloudLibrary").is_none());
}

#[tokio::test]
async fn test_missing_query_is_rejected_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(0)
        .mount(&server)
        .await;

    for uri in ["/", "/?query=", "/?query=%20%20", "/?other=dune"] {
        let (status, headers, body) = get(app(&server, &["a", "b"]), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert!(body.is_empty());
        assert_eq!(headers["access-control-allow-origin"], "*");
    }
}

#[tokio::test]
async fn test_no_markers_returns_empty_array() {
    let server = MockServer::start().await;
    for domain in ["a", "b", "c"] {
        mount_page(&server, domain, empty_page()).await;
    }

    let (status, _, body) = get(app(&server, &["a", "b", "c"]), "/?query=nothing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"Overdrive":[]}"#);
}

#[tokio::test]
async fn test_failed_target_is_dropped() {
    let server = MockServer::start().await;
    mount_page(&server, "a", catalog_page("lib-a", r#"{"title":"Dune"}"#)).await;
    Mock::given(method("GET"))
        .and(path("/b/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, _, body) = get(app(&server, &["b", "a"]), "/?query=dune").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"Overdrive": [{"library": "lib-a", "data": {"title": "Dune"}}]})
    );
}

#[tokio::test]
async fn test_unreachable_target_is_dropped() {
    let server = MockServer::start().await;
    mount_page(&server, "a", catalog_page("lib-a", "{}")).await;

    // A port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let settings = Settings {
        providers: vec![ProviderConfig {
            name: "overdrive".to_string(),
            provider: "overdrive".to_string(),
            url_template: "http://{domain}/search".to_string(),
            domains: vec![
                server.address().to_string() + "/a",
                dead.to_string(),
            ],
            ..Default::default()
        }],
        ..Default::default()
    };
    let registry = ProviderLoader::load(&settings);
    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    let app = create_router(AppState::new(settings, registry, Arc::new(client)));

    let (status, _, body) = get(app, "/?query=dune").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(libraries(&body), HashSet::from(["lib-a".to_string()]));
}

#[tokio::test]
async fn test_malformed_json_keeps_other_results() {
    let server = MockServer::start().await;
    mount_page(&server, "good", catalog_page("lib-good", r#"{"title":"Dune"}"#)).await;
    mount_page(&server, "broken", catalog_page("lib-broken", r#"{"title": "Dune""#)).await;

    let (status, _, body) = get(app(&server, &["good", "broken"]), "/?query=dune").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let records = body["Overdrive"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    for record in records {
        match record["library"].as_str().unwrap() {
            "lib-good" => assert_eq!(record["data"], json!({"title": "Dune"})),
            "lib-broken" => assert_eq!(record["data"], json!({})),
            other => panic!("unexpected library {}", other),
        }
    }
}

#[tokio::test]
async fn test_query_is_escaped_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/search"))
        .and(query_param("query", "the hobbit & co"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page("lib-a", "{}")))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(app(&server, &["a"]), "/?query=the%20hobbit%20%26%20co").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(libraries(&body), HashSet::from(["lib-a".to_string()]));
}

#[tokio::test]
async fn test_repeated_query_returns_same_set() {
    let server = MockServer::start().await;
    for (domain, tenant) in [("a", "lib-a"), ("b", "lib-b"), ("c", "lib-c")] {
        mount_page(&server, domain, catalog_page(tenant, "[]")).await;
    }
    mount_page(&server, "d", empty_page()).await;

    let app = app(&server, &["a", "b", "c", "d"]);
    let (_, _, first) = get(app.clone(), "/?query=dune").await;
    let (_, _, second) = get(app, "/?query=dune").await;

    let first: Value = serde_json::from_slice(&first).unwrap();
    let second: Value = serde_json::from_slice(&second).unwrap();
    assert_eq!(libraries(&first), libraries(&second));
    assert_eq!(libraries(&first).len(), 3);
}

#[tokio::test]
async fn test_stats_and_health() {
    let server = MockServer::start().await;
    mount_page(&server, "a", catalog_page("lib-a", "{}")).await;
    mount_page(&server, "b", empty_page()).await;

    let app = app(&server, &["a", "b"]);
    let (status, _, _) = get(app.clone(), "/?query=dune").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = get(app.clone(), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["total_searches"], 1);
    assert_eq!(stats["domains"]["a"]["found"], 1);
    assert_eq!(stats["domains"]["b"]["absent"], 1);

    let (status, _, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], libsearch::VERSION);
}

#[tokio::test]
async fn test_repeated_query_uses_first_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/search"))
        .and(query_param("query", "dune"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page("lib-a", "{}")))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(app(&server, &["a"]), "/?query=dune&query=x").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(libraries(&body), HashSet::from(["lib-a".to_string()]));
}

#[tokio::test]
async fn test_repeated_query_with_empty_first_value_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(0)
        .mount(&server)
        .await;

    let (status, _, body) = get(app(&server, &["a"]), "/?query=&query=dune").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_any_path_and_method_searches() {
    let server = MockServer::start().await;
    mount_page(&server, "a", catalog_page("lib-a", "{}")).await;

    let (status, _, body) = get(app(&server, &["a"]), "/books?query=dune").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(libraries(&body), HashSet::from(["lib-a".to_string()]));

    let (status, _, body) = get(app(&server, &["a"]), "/books").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let response = app(&server, &["a"])
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/?query=dune")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

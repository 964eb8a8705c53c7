//! Integration tests for the HTTP API

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::net::TcpListener;

use mentor::api::server::{ApiServer, ApiServerConfig};
use mentor_kg::{GraphSnapshot, MentorConfig};

/// Test helper to start the API server in the background on an ephemeral port
async fn start_test_server(graph_path: Option<PathBuf>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = ApiServer::new(ApiServerConfig {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
        graph_path,
        mentor: MentorConfig::default(),
    });
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    addr
}

async fn seed(client: &Client, base: &str) {
    for (id, title) in [
        ("kv-cache", "KV Cache"),
        ("attention", "Attention"),
        ("transformer", "Transformer"),
    ] {
        let response = client
            .post(format!("{}/concepts", base))
            .json(&json!({ "id": id, "title": title, "summary": format!("{} basics", title) }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    for (source, target) in [("kv-cache", "attention"), ("attention", "transformer")] {
        let response = client
            .post(format!("{}/edges", base))
            .json(&json!({ "source": source, "target": target, "kind": "prerequisite" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn get_json(client: &Client, url: String) -> (StatusCode, Value) {
    let response = client.get(url).send().await.unwrap();
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let addr = start_test_server(None).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["graph_version"], 0);
}

#[tokio::test]
async fn test_context_pack_document() {
    let addr = start_test_server(None).await;
    let base = format!("http://{}", addr);
    let client = Client::new();
    seed(&client, &base).await;

    let (status, body) = get_json(
        &client,
        format!("{}/concepts/kv-cache/context-pack?budget=10", base),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["root"], "kv-cache");
    assert_eq!(body["truncated"], false);
    assert_eq!(body["itemCount"], 3);
    assert!(body["generatedAt"].is_string());

    let items = body["items"].as_array().unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i["conceptId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["kv-cache", "attention", "transformer"]);
    assert_eq!(items[1]["depth"], 1);
    assert_eq!(items[1]["relation"], "prerequisite");
    assert_eq!(items[1]["summary"], "Attention basics");
    assert!(items[0]["relation"].is_null());

    let (_, short) = get_json(
        &client,
        format!("{}/concepts/kv-cache/context-pack?budget=2", base),
    )
    .await;
    assert_eq!(short["truncated"], true);
    assert_eq!(short["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_context_pack_errors() {
    let addr = start_test_server(None).await;
    let base = format!("http://{}", addr);
    let client = Client::new();
    seed(&client, &base).await;

    let (status, body) = get_json(
        &client,
        format!("{}/concepts/ghost/context-pack?budget=5", base),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));

    let (status, body) = get_json(
        &client,
        format!("{}/concepts/kv-cache/context-pack?budget=0", base),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    for budget in ["-1", "abc"] {
        let response = client
            .get(format!("{}/concepts/kv-cache/context-pack?budget={}", base, budget))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "budget {}", budget);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_write_invalidates_cached_pack() {
    let addr = start_test_server(None).await;
    let base = format!("http://{}", addr);
    let client = Client::new();
    seed(&client, &base).await;

    let pack_url = format!("{}/concepts/kv-cache/context-pack?budget=10", base);
    let (_, before) = get_json(&client, pack_url.clone()).await;
    let (_, repeat) = get_json(&client, pack_url.clone()).await;
    assert_eq!(before["cacheKey"], repeat["cacheKey"]);

    let response = client
        .patch(format!("{}/concepts/attention", base))
        .json(&json!({ "title": "Self-Attention", "mastery": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, after) = get_json(&client, pack_url).await;
    assert_eq!(after["items"][1]["title"], "Self-Attention");
    assert_eq!(after["items"][1]["mastery"], 2);
    assert_ne!(before["cacheKey"], after["cacheKey"]);

    let (_, stats) = get_json(&client, format!("{}/cache/stats", base)).await;
    assert_eq!(stats["hits"], 1);
}

#[tokio::test]
async fn test_concept_and_edge_crud() {
    let addr = start_test_server(None).await;
    let base = format!("http://{}", addr);
    let client = Client::new();
    seed(&client, &base).await;

    let duplicate = client
        .post(format!("{}/concepts", base))
        .json(&json!({ "id": "attention", "title": "Again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let dup_edge = client
        .post(format!("{}/edges", base))
        .json(&json!({ "source": "kv-cache", "target": "attention", "kind": "prerequisite" }))
        .send()
        .await
        .unwrap();
    assert_eq!(dup_edge.status(), StatusCode::CONFLICT);

    let unlink = client
        .delete(format!("{}/edges", base))
        .json(&json!({ "source": "attention", "target": "transformer", "kind": "prerequisite" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unlink.status(), StatusCode::NO_CONTENT);

    let remove = client
        .delete(format!("{}/concepts/transformer", base))
        .send()
        .await
        .unwrap();
    assert_eq!(remove.status(), StatusCode::NO_CONTENT);

    let (status, _) = get_json(&client, format!("{}/concepts/transformer", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = get_json(&client, format!("{}/concepts", base)).await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["attention", "kv-cache"]);

    let blank = client
        .post(format!("{}/concepts", base))
        .json(&json!({ "id": "blank", "title": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_writes_persist_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");

    let addr = start_test_server(Some(path.clone())).await;
    let base = format!("http://{}", addr);
    let client = Client::new();
    seed(&client, &base).await;

    let snapshot = GraphSnapshot::load(&path).unwrap();
    assert_eq!(snapshot.concepts.len(), 3);
    assert_eq!(snapshot.edges.len(), 2);

    // A second server over the same file sees the graph
    let addr = start_test_server(Some(path)).await;
    let (status, body) = get_json(
        &Client::new(),
        format!("http://{}/concepts/kv-cache/context-pack", addr),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 3);
    assert_eq!(body["cacheKey"], "context_pack:kv-cache?budget=25&v=0");
}

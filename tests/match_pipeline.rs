//! End-to-end tests: real HTTP server over mock collaborators.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use scholarmatch::{
    HandlerState, MatchWorkflow, MockCandidateStore, MockEmbedder, MockReranker, RerankCache,
    TelemetrySink, WorkflowOptions, create_router_with_state,
};

struct TestServer {
    addr: SocketAddr,
    embedder: Arc<MockEmbedder>,
    store: Arc<MockCandidateStore>,
    reranker: Arc<MockReranker>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn spawn_test_server(store: MockCandidateStore, reranker: MockReranker) -> TestServer {
    let embedder = Arc::new(MockEmbedder::new(8));
    let store = Arc::new(store);
    let reranker = Arc::new(reranker);

    let workflow = Arc::new(MatchWorkflow::new(
        embedder.clone(),
        store.clone(),
        reranker.clone(),
        Arc::new(RerankCache::new()),
        Arc::new(TelemetrySink::new()),
        WorkflowOptions::default(),
    ));
    let app = create_router_with_state(HandlerState::new(workflow));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr,
        embedder,
        store,
        reranker,
        _handle: handle,
    }
}

async fn post_match(server: &TestServer, body: serde_json::Value) -> (u16, serde_json::Value) {
    let client = reqwest::Client::new();
    let response = client
        .post(server.url("/v1/match"))
        .json(&body)
        .send()
        .await
        .expect("request failed");

    let status = response.status().as_u16();
    let json = response.json().await.expect("non-JSON body");
    (status, json)
}

#[tokio::test]
async fn test_full_pipeline_with_rerank() {
    let server = spawn_test_server(MockCandidateStore::with_rows(20), MockReranker::reversing()).await;

    let (status, json) = post_match(
        &server,
        serde_json::json!({
            "student_summary": "Canadian undergraduate CS student, low income",
            "k": 20,
            "use_reranker": true
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(json["ok"], true);
    assert_eq!(json["rows"].as_array().unwrap().len(), 20);
    assert_eq!(json["meta"]["usedReranker"], true);
    assert!(json["rows"][0]["score"].is_number());
    assert_eq!(server.reranker.call_count(), 1);
}

#[tokio::test]
async fn test_tiny_result_set_never_reranks() {
    let server = spawn_test_server(MockCandidateStore::with_rows(2), MockReranker::reversing()).await;

    let (status, json) = post_match(
        &server,
        serde_json::json!({ "student_summary": "x", "use_reranker": true }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(json["meta"]["usedReranker"], false);
    assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    assert_eq!(server.reranker.call_count(), 0);
}

#[tokio::test]
async fn test_repeated_request_hits_cache() {
    let server = spawn_test_server(MockCandidateStore::with_rows(5), MockReranker::reversing()).await;

    let body = serde_json::json!({ "student_summary": "CS undergrad, robotics" });
    let (_, first) = post_match(&server, body.clone()).await;
    let (_, second) = post_match(&server, body).await;

    assert_eq!(server.reranker.call_count(), 1);
    assert_eq!(second["meta"]["rerankMs"], 0);
    assert_eq!(first["rows"], second["rows"]);
}

#[tokio::test]
async fn test_validation_error_over_http() {
    let server = spawn_test_server(MockCandidateStore::with_rows(5), MockReranker::new()).await;

    let (status, json) = post_match(&server, serde_json::json!({ "student_summary": "" })).await;

    assert_eq!(status, 400);
    assert_eq!(json["ok"], false);
    assert!(json["error"].is_string());
    assert_eq!(server.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_failure_over_http() {
    let server = spawn_test_server(MockCandidateStore::with_rows(5), MockReranker::new()).await;
    server.store.fail_with("qdrant unreachable");

    let (status, json) = post_match(
        &server,
        serde_json::json!({ "student_summary": "CS undergrad" }),
    )
    .await;

    assert_eq!(status, 502);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_telemetry_over_http() {
    let server = spawn_test_server(MockCandidateStore::with_rows(5), MockReranker::new()).await;

    post_match(
        &server,
        serde_json::json!({ "student_summary": "CS undergrad" }),
    )
    .await;

    let client = reqwest::Client::new();
    let json: serde_json::Value = client
        .get(server.url("/v1/telemetry?limit=20"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["ok"], true);
    let steps: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["step"].as_str().unwrap())
        .collect();
    assert!(steps.contains(&"pipeline"));
    assert!(steps.contains(&"embed"));
    assert!(steps.contains(&"retrieve"));
}

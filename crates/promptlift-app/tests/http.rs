use std::time::Duration;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use promptlift_app::server::{
    serve_with_listener, FALLBACK_HEADER, FALLBACK_REASON_HEADER, PATH_HEADER,
};
use promptlift_engine::{Optimizer, RemoteSettings};

struct TestServer {
    base: String,
    shutdown: CancellationToken,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn spawn(optimizer: Optimizer) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        serve_with_listener(listener, optimizer, Duration::from_secs(5), token)
            .await
            .unwrap();
    });
    TestServer {
        base: format!("http://{}", addr),
        shutdown,
    }
}

async fn upstream_optimizer(server: &MockServer) -> Optimizer {
    let settings = RemoteSettings::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("test-key".to_string()),
    );
    Optimizer::from_settings(Some(settings)).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn(Optimizer::local_only()).await;
    let resp = reqwest::get(format!("{}/health", server.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn blank_or_invalid_prompt_is_rejected() {
    let server = spawn(Optimizer::local_only()).await;
    let client = reqwest::Client::new();

    for body in [
        r#"{"prompt":"   "}"#,
        r#"{"prompt":7}"#,
        r#"{}"#,
        "not json",
    ] {
        let resp = client
            .post(format!("{}/api/optimize", server.base))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "body {body:?}");
        assert_eq!(
            resp.json::<Value>().await.unwrap(),
            json!({"error": "prompt is required"})
        );
    }
}

#[tokio::test]
async fn local_only_server_returns_heuristic_result() {
    let server = spawn(Optimizer::local_only()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/optimize", server.base))
        .json(&json!({"prompt": "Make the homepage better"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()[PATH_HEADER], "local");
    assert!(resp.headers().get(FALLBACK_HEADER).is_none());
    assert!(resp.headers().get(FALLBACK_REASON_HEADER).is_none());

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["original"], "Make the homepage better");
    assert_eq!(body["category"], "detailed");
    let improvements = body["improvements"].as_array().unwrap();
    assert!(improvements.contains(&json!("fix: vague term: \"better\"")));
}

#[tokio::test]
async fn upstream_failure_degrades_and_is_flagged() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&upstream)
        .await;

    let server = spawn(upstream_optimizer(&upstream).await).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/optimize", server.base))
        .json(&json!({"prompt": "Change the colors to blue"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()[PATH_HEADER], "local");
    assert_eq!(resp.headers()[FALLBACK_HEADER], "upstream");
    let reason = resp.headers()[FALLBACK_REASON_HEADER].to_str().unwrap();
    assert!(reason.contains("500"), "{reason}");
    assert!(reason.chars().count() <= 300);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "theming");
}

#[tokio::test]
async fn upstream_success_is_returned_verbatim() {
    let upstream = MockServer::start().await;
    let reply = json!({
        "optimized": "On the homepage, enlarge the primary call-to-action button",
        "improvements": ["named a location"],
        "category": "detailed"
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        })))
        .mount(&upstream)
        .await;

    let server = spawn(upstream_optimizer(&upstream).await).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/optimize", server.base))
        .json(&json!({"prompt": "Make the homepage better"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()[PATH_HEADER], "remote");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "original": "Make the homepage better",
            "optimized": "On the homepage, enlarge the primary call-to-action button",
            "improvements": ["named a location"],
            "category": "detailed"
        })
    );
}

#[tokio::test]
async fn guide_lists_rules_and_tips() {
    let server = spawn(Optimizer::local_only()).await;
    let body: Value = reqwest::get(format!("{}/api/guide", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["rules"].as_array().unwrap().len(), 6);
    assert_eq!(body["tips"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn unknown_routes_and_methods_are_not_found() {
    let server = spawn(Optimizer::local_only()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/nope", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.unwrap(), "Not found");

    let resp = client
        .get(format!("{}/api/optimize", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let server = spawn(Optimizer::local_only()).await;
    let resp = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/optimize", server.base),
        )
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn fallback_headers_are_exposed_to_browsers() {
    let server = spawn(Optimizer::local_only()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/optimize", server.base))
        .header("origin", "http://localhost:5173")
        .json(&json!({"prompt": "Make it better"}))
        .send()
        .await
        .unwrap();
    let exposed = resp.headers()["access-control-expose-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains(FALLBACK_REASON_HEADER), "{exposed}");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = spawn(Optimizer::local_only()).await;
    let prompt = "a".repeat(70_000);
    let resp = reqwest::Client::new()
        .post(format!("{}/api/optimize", server.base))
        .json(&json!({"prompt": prompt}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
}

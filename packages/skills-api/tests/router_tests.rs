use std::sync::Arc;
use std::thread;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use serde_json::{json, Value};
use skills_api::{ApiConfig, Router};
use skills_core::{MemorySkillStore, Skill, SkillStore};
use skills_runtime::{RuntimeConfig, SkillRuntime};

/// Builds a router backed by a memory store drained on its own thread.
///
/// The runtime thread exits once the router (and its sender) is dropped.
fn setup(config: ApiConfig) -> (Router, Arc<MemorySkillStore>) {
    let store = Arc::new(MemorySkillStore::new());
    let (api_tx, mut runtime) = SkillRuntime::with_channel(store.clone(), &RuntimeConfig::default());
    thread::spawn(move || runtime.run());

    let router = Router::new(Arc::new(config), api_tx).unwrap();
    (router, store)
}

fn seed(store: &MemorySkillStore) {
    store
        .create(Skill {
            key: "go".to_string(),
            name: "test".to_string(),
            description: "testDescription".to_string(),
            logo: "testLogo".to_string(),
            tags: vec!["programming language".to_string(), "system".to_string()],
        })
        .unwrap();
}

fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn send(router: &Router, req: Request<Full<Bytes>>) -> (u16, Value) {
    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => Response::from(err),
    };
    let status = response.status().as_u16();
    let body = serde_json::from_slice(response.body()).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_list_returns_seeded_skill() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let (status, body) = send(&router, request(Method::GET, "/api/v1/skills", "")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"][0]["key"], "go");
    assert_eq!(body["data"][0]["tags"], json!(["programming language", "system"]));
}

#[tokio::test]
async fn test_list_empty_store_is_empty_array() {
    let (router, _store) = setup(ApiConfig::default());

    let (status, body) = send(&router, request(Method::GET, "/api/v1/skills", "")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_get_missing_skill_is_not_found() {
    let (router, _store) = setup(ApiConfig::default());

    let (status, body) = send(&router, request(Method::GET, "/api/v1/skills/nope", "")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"status": "error", "message": "Skill not found"}));
}

#[tokio::test]
async fn test_create_then_duplicate_create() {
    let (router, store) = setup(ApiConfig::default());
    let payload = json!({
        "key": "python",
        "name": "Python",
        "description": "Python is an interpreted language",
        "logo": "https://example.com/python.png",
        "tags": ["programming language", "scripting"]
    })
    .to_string();

    let (status, body) = send(&router, request(Method::POST, "/api/v1/skills", &payload)).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["key"], "python");

    let duplicate = json!({"key": "python", "name": "Other"}).to_string();
    let (status, body) = send(&router, request(Method::POST, "/api/v1/skills", &duplicate)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Python");
    assert_eq!(store.get("python").unwrap().name, "Python");
}

#[tokio::test]
async fn test_create_rejects_bad_payload() {
    let (router, _store) = setup(ApiConfig::default());

    let (status, body) = send(&router, request(Method::POST, "/api/v1/skills", "not json")).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Can't bind payload"));

    let (status, _) = send(&router, request(Method::POST, "/api/v1/skills", r#"{"key": " "}"#)).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_replace_checks_body_key() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let mismatched = json!({"key": "rust", "name": "x"}).to_string();
    let (status, body) = send(&router, request(Method::PUT, "/api/v1/skills/go", &mismatched)).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Key does not match");

    let update = json!({
        "key": "go",
        "name": "Go",
        "description": "updated",
        "logo": "logo",
        "tags": ["compiled"]
    })
    .to_string();
    let (status, body) = send(&router, request(Method::PUT, "/api/v1/skills/go", &update)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Go");
    assert_eq!(body["data"]["tags"], json!(["compiled"]));
}

#[tokio::test]
async fn test_replace_missing_skill_is_not_found() {
    let (router, _store) = setup(ApiConfig::default());

    let update = json!({"name": "x"}).to_string();
    let (status, _) = send(&router, request(Method::PUT, "/api/v1/skills/nope", &update)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_patch_each_field() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let cases = [
        ("name", json!({"name": "test name"})),
        ("description", json!({"description": "test description"})),
        ("logo", json!({"logo": "test logo"})),
        ("tags", json!({"tags": ["test tags"]})),
    ];
    for (field, payload) in cases {
        let uri = format!("/api/v1/skills/go/actions/{}", field);
        let (status, body) = send(&router, request(Method::PATCH, &uri, &payload.to_string())).await;
        assert_eq!(status, 200, "patching {}", field);
        assert_eq!(body["data"][field], payload[field]);
        assert_eq!(body["data"]["key"], "go");
    }
}

#[tokio::test]
async fn test_patch_wrong_type_is_bad_request() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let (status, _) = send(
        &router,
        request(Method::PATCH, "/api/v1/skills/go/actions/tags", r#"{"tags": "one"}"#),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(store.get("go").unwrap().tags.len(), 2);
}

#[tokio::test]
async fn test_patch_unknown_field_has_no_route() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let (status, body) = send(
        &router,
        request(Method::PATCH, "/api/v1/skills/go/actions/color", r#"{"color": "red"}"#),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No route found for /api/v1/skills/go/actions/color");
}

#[tokio::test]
async fn test_unknown_field_has_no_route_for_any_method() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let (status, body) =
            send(&router, request(method.clone(), "/api/v1/skills/go/actions/color", "")).await;
        assert_eq!(status, 404, "{}", method);
        assert_eq!(body["message"], "No route found for /api/v1/skills/go/actions/color");
    }

    let (status, body) = send(&router, request(Method::GET, "/api/v1/skills/go/actions/name", "")).await;
    assert_eq!(status, 405);
    assert_eq!(body["message"], "Method Not Allowed");
}

#[tokio::test]
async fn test_delete_then_get() {
    let (router, store) = setup(ApiConfig::default());
    seed(&store);

    let (status, body) = send(&router, request(Method::DELETE, "/api/v1/skills/go", "")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "success", "message": "Skill deleted"}));

    let (status, _) = send(&router, request(Method::GET, "/api/v1/skills/go", "")).await;
    assert_eq!(status, 404);

    let (status, _) = send(&router, request(Method::DELETE, "/api/v1/skills/go", "")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_percent_encoded_key() {
    let (router, _store) = setup(ApiConfig::default());

    let payload = json!({"key": "c++", "name": "C++"}).to_string();
    let (status, _) = send(&router, request(Method::POST, "/api/v1/skills", &payload)).await;
    assert_eq!(status, 201);

    let (status, body) = send(&router, request(Method::GET, "/api/v1/skills/c%2B%2B", "")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "C++");
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let (router, _store) = setup(ApiConfig::default());

    let (status, body) = send(&router, request(Method::GET, "/api/v2/skills", "")).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No route found for /api/v2/skills");

    let (status, body) = send(&router, request(Method::DELETE, "/api/v1/skills", "")).await;
    assert_eq!(status, 405);
    assert_eq!(body["message"], "Method Not Allowed");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ApiConfig {
        max_body_bytes: 16,
        ..ApiConfig::default()
    };
    let (router, store) = setup(config);

    let payload = json!({"key": "python", "description": "far more than sixteen bytes"}).to_string();
    let (status, _) = send(&router, request(Method::POST, "/api/v1/skills", &payload)).await;
    assert_eq!(status, 413);
    assert!(store.is_empty());
}

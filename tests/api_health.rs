use api_scaffold::{app, AppContext, AppState, Settings};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for oneshot

fn router(vars: &[(&str, &str)]) -> Router {
    let settings = Arc::new(Settings::from_vars(vars.iter().copied()).unwrap());
    let state = AppState::new(Arc::new(AppContext::new(settings))).unwrap();
    app(state).unwrap()
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn liveness_is_ok_without_a_database() {
    let (status, body) = get(router(&[]), "/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn readiness_reports_unstarted_pool_as_false() {
    let (status, body) = get(router(&[]), "/readiness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "pg": false }));
}

#[tokio::test]
async fn readiness_keys_follow_monitored_components() {
    let (status, body) = get(router(&[("S3__ENABLED", "true")]), "/readiness").await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"pg"));
    assert!(keys.contains(&"s3"));
    assert!(body.as_object().unwrap().values().all(|v| v == &Value::Bool(false)));
}

#[tokio::test]
async fn concurrent_readiness_requests_all_complete() {
    let router = router(&[]);
    let mut tasks = Vec::new();
    for _ in 0..32 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move { get(router, "/readiness").await }));
    }
    for task in tasks {
        let (status, body) = tokio::time::timeout(Duration::from_secs(10), task)
            .await
            .expect("readiness request hung")
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "pg": false }));
    }
}

#[tokio::test]
async fn business_logic_needs_a_started_pool() {
    let (status, body) = get(router(&[]), "/do").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "not_started");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let (status, body) = get(router(&[("DOC__TITLE", "Scaffold"), ("DOC__VERSION", "1.2.3")]), "/doc.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Scaffold");
    assert_eq!(body["info"]["version"], "1.2.3");
    assert_eq!(body["servers"][0]["url"], "http://0.0.0.0:8001");
    assert_eq!(body["servers"][1]["url"], "https://0.0.0.0:8001");
    let paths = body["paths"].as_object().unwrap();
    for path in ["/liveness", "/readiness", "/do"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[tokio::test]
async fn doc_route_is_configurable() {
    let router = router(&[("DOC__ROUTE", "/openapi.json")]);
    let (status, _) = get(router.clone(), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(router, "/doc.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn routes_are_mounted_under_base_url() {
    let router = router(&[("APP__BASE_URL", "/api/")]);
    let (status, body) = get(router.clone(), "/api/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    let (status, _) = get(router, "/liveness").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn credentialed_cors_mirrors_the_origin() {
    let req = Request::builder()
        .uri("/liveness")
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap();
    let response = router(&[]).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn cors_origin_list_rejects_unknown_origins() {
    let router = router(&[("APP__CORS__ALLOW_ORIGINS", "https://allowed.example")]);
    let req = Request::builder()
        .uri("/liveness")
        .header(header::ORIGIN, "https://other.example")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let req = Request::builder()
        .uri("/liveness")
        .header(header::CONTENT_LENGTH, "1024")
        .body(Body::from(vec![b'x'; 1024]))
        .unwrap();
    let response = router(&[("APP__CLIENT_MAX_SIZE", "16")]).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

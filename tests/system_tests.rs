mod test_utils;

use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn home_serves_welcome_html() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("<h1>Welcome to QAsset</h1>"));
}

#[actix_rt::test]
async fn robots_txt_disallows_everything() {
    let app = TestApp::spawn().await;

    let response = app.get("/robots.txt").await;

    assert_eq!(response.text().await.unwrap(), "User-agent: *\nDisallow: /");
}

#[actix_rt::test]
async fn responses_carry_security_headers() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
}

#[actix_rt::test]
async fn readiness_follows_storage_roots() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/livez").await.status(), StatusCode::OK);
    assert_eq!(app.get("/readyz").await.status(), StatusCode::OK);

    std::fs::remove_dir_all(app.file_root()).unwrap();

    assert_eq!(app.get("/readyz").await.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.get("/livez").await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn metrics_reports_runtime_state() {
    let app = TestApp::spawn().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let metrics: Value = response.json().await.unwrap();
    assert_eq!(metrics["version"], env!("CARGO_PKG_VERSION"));
    assert!(metrics["uptime"].is_string());
    assert!(metrics["storage"].is_object());
}

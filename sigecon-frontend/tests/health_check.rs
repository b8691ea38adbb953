use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use sigecon_frontend::config::{BackendSettings, ExtractorSettings};
use sigecon_frontend::services::{api_client::ApiClient, extractor_client::ExtractorClient};
use sigecon_frontend::startup::build_router;
use sigecon_frontend::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router wired to unreachable upstreams. Client construction never touches
/// the network, so everything short of an actual backend call is testable.
fn test_app() -> axum::Router {
    let api = Arc::new(ApiClient::new(BackendSettings {
        url: "http://127.0.0.1:9/api".to_string(),
    }));
    let extractor = Arc::new(ExtractorClient::new(ExtractorSettings {
        url: "http://127.0.0.1:9".to_string(),
    }));
    build_router(AppState::new(api, extractor))
}

#[tokio::test]
async fn health_check_works() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_redirects_anonymous_to_login() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
}

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    for uri in ["/dashboard", "/contracts", "/orders", "/users"] {
        let app = test_app();
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri: {}", uri);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login",
            "uri: {}",
            uri
        );
    }
}

#[tokio::test]
async fn login_page_renders() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("CPF"));
    assert!(html.contains("Senha"));
}

#[tokio::test]
async fn login_rejects_empty_credentials_before_any_backend_call() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("cpf=&senha="))
                .unwrap(),
        )
        .await
        .unwrap();

    // the backend is unreachable, so a 422 here proves validation ran first
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Informe CPF e senha."));
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    sigecon_frontend::services::metrics::init_metrics();
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

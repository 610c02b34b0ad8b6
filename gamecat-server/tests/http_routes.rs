//! In-process router tests - no database required

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use gamecat_server::db::{Catalog, ConnectionError, ConnectionManager, Connector};
use gamecat_server::http::{build_router, AppState};
use gamecat_server::{DatabaseSettings, DatabaseTarget};

/// Store that can never be reached; counts how often it was asked.
struct UnreachableStore {
    opens: Arc<AtomicUsize>,
}

#[async_trait]
impl Connector for UnreachableStore {
    async fn open(&self) -> Result<PgPool, ConnectionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Err(ConnectionError::unreachable(sqlx::Error::PoolTimedOut))
    }
}

fn unreachable_app(tag: &str) -> (axum::Router, Arc<AtomicUsize>) {
    let opens = Arc::new(AtomicUsize::new(0));
    let db = Arc::new(ConnectionManager::new(UnreachableStore {
        opens: opens.clone(),
    }));
    let state = AppState::new(Catalog::new(db), tag);
    (build_router(state, &[]), opens)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_tag_without_database() {
    let (app, opens) = unreachable_app("v1.2.3");

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Server is running with tag v1.2.3" }));
    assert_eq!(opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_with_unset_tag() {
    let db = Arc::new(ConnectionManager::new(UnreachableStore {
        opens: Arc::new(AtomicUsize::new(0)),
    }));
    let config = gamecat_server::ServerConfig::default();
    let app = build_router(AppState::new(Catalog::new(db), config.tag), &[]);

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Server is running with tag " }));
}

#[tokio::test]
async fn games_is_500_when_store_unreachable() {
    let (app, opens) = unreachable_app("dev");

    let (status, body) = get(app, "/games").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert_eq!(opens.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_failures_do_not_reconnect() {
    let (app, opens) = unreachable_app("dev");

    for _ in 0..3 {
        let (status, _) = get(app.clone(), "/games").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert_eq!(opens.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn games_is_500_when_postgres_refuses() {
    // Nothing listens on port 1
    let settings = DatabaseSettings::new(DatabaseTarget::Parts {
        user: "games".into(),
        password: "pw".into(),
        host: "127.0.0.1".into(),
        port: 1,
        database: "catalog".into(),
    })
    .with_acquire_timeout(Duration::from_millis(500));
    let db = Arc::new(ConnectionManager::postgres(settings));
    let app = build_router(AppState::new(Catalog::new(db.clone()), "dev"), &[]);

    let (status, body) = get(app, "/games").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert!(!db.is_connected());
}

#[tokio::test]
async fn cors_headers_present() {
    let (app, _) = unreachable_app("dev");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

#[tokio::test]
async fn configured_cors_origin_is_echoed() {
    let db = Arc::new(ConnectionManager::new(UnreachableStore {
        opens: Arc::new(AtomicUsize::new(0)),
    }));
    let app = build_router(
        AppState::new(Catalog::new(db), "dev"),
        &["http://localhost:3000".to_string()],
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _) = unreachable_app("dev");

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

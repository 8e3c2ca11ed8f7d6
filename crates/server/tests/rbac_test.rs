//! Axum integration test driving the router end to end through an in-memory
//! `Repos`, exercising RBAC denial at the HTTP boundary rather than unit
//! testing `rbac::has_permission` directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use thecloud_server::config::{Environment, ThecloudConfig};
use thecloud_server::db::fake::test_repos;
use thecloud_server::domain::{ApiKey, Role, User};
use thecloud_server::engine::FakeEngine;
use thecloud_server::http::{build_router, AppState};
use thecloud_server::metrics::Metrics;

fn test_config() -> ThecloudConfig {
    ThecloudConfig {
        database_url: String::new(),
        port: 8080,
        environment: Environment::Development,
        encryption_secret: "test".into(),
        max_instances_hard_limit: 100,
        max_scaling_groups_per_vpc: 10,
        min_cooldown_seconds: 60,
        docker_socket: String::new(),
        storage_root: "./data".into(),
    }
}

async fn seed_user_with_key(repos: &thecloud_server::db::Repos, role: Role) -> String {
    let now = chrono::Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role.as_str()),
        password_hash: "unused".into(),
        name: role.as_str().to_string(),
        role: role.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };
    repos.users.create(&user).await.unwrap();

    let key = format!("key-{}", Uuid::new_v4());
    repos
        .api_keys
        .create(&ApiKey {
            key: key.clone(),
            user_id: user.id,
            name: "test".into(),
            created_at: now,
        })
        .await
        .unwrap();
    key
}

#[tokio::test]
async fn viewer_is_forbidden_from_terminating_an_instance() {
    let repos = test_repos();
    let viewer_key = seed_user_with_key(&repos, Role::Viewer).await;

    let state = AppState::new(
        repos,
        Arc::new(test_config()),
        Arc::new(FakeEngine::new()),
        Arc::new(Metrics::new()),
    );
    let app = build_router(state);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/instances/{}", Uuid::new_v4()))
        .header("x-api-key", viewer_key)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_api_key_is_unauthorized() {
    let repos = test_repos();
    let state = AppState::new(
        repos,
        Arc::new(test_config()),
        Arc::new(FakeEngine::new()),
        Arc::new(Metrics::new()),
    );
    let app = build_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/instances")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ready_reports_ok_against_the_in_memory_fakes() {
    let repos = test_repos();
    let state = AppState::new(
        repos,
        Arc::new(test_config()),
        Arc::new(FakeEngine::new()),
        Arc::new(Metrics::new()),
    );
    let app = build_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/ready")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["db"], true);
    assert_eq!(json["engine"], true);
}

//! End-to-end tests against the real router: login/lockout flow, admin
//! gating, directory CRUD, and search, all over HTTP.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use directory::{app, config::Config, state::AppState};

fn test_app(secret: Option<&str>) -> Router {
    app(test_state(secret))
}

fn test_state(secret: Option<&str>) -> Arc<AppState> {
    AppState::new(Config {
        port: 0,
        admin_secret: secret.map(str::to_string),
        max_attempts: 3,
        lockout: Duration::from_secs(14_400),
    })
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(router: &Router, password: &str) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        "/api/admin/login",
        None,
        Some(json!({ "password": password })),
    )
    .await
}

async fn admin_token(router: &Router, password: &str) -> String {
    let (status, body) = login(router, password).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_lockout_flow() {
    let router = test_app(Some("s3cr3t"));

    let (status, body) = login(&router, "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_secret");
    assert_eq!(body["attempts_remaining"], 2);

    let (_, body) = login(&router, "wrong").await;
    assert_eq!(body["attempts_remaining"], 1);

    let (status, body) = login(&router, "wrong").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "locked_out");
    assert_eq!(body["retry_after_secs"], 14_400);

    // The correct password does not bypass an active lockout.
    let (status, body) = login(&router, "s3cr3t").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "locked_out");

    let (status, body) = send(&router, "GET", "/api/admin/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locked"], true);
    assert!(body["remaining_seconds"].as_u64().unwrap() > 14_000);
}

#[tokio::test]
async fn status_starts_unlocked() {
    let router = test_app(Some("s3cr3t"));

    let (status, body) = send(&router, "GET", "/api/admin/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locked"], false);
    assert_eq!(body["attempts_remaining"], 3);
}

#[tokio::test]
async fn successful_login_issues_a_usable_token() {
    let router = test_app(Some("s3cr3t"));

    let (status, _) = send(
        &router,
        "POST",
        "/api/groups",
        None,
        Some(json!({ "name": "Rust Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        "POST",
        "/api/groups",
        Some("forged-token"),
        Some(json!({ "name": "Rust Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = admin_token(&router, "s3cr3t").await;
    let (status, body) = send(
        &router,
        "POST",
        "/api/groups",
        Some(&token),
        Some(json!({ "name": "Rust Club", "description": "systems programming" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rust Club");
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn failed_attempts_reset_after_successful_login() {
    let router = test_app(Some("s3cr3t"));

    let _ = login(&router, "wrong").await;
    let _ = login(&router, "wrong").await;
    let (status, _) = login(&router, "s3cr3t").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, "GET", "/api/admin/status", None, None).await;
    assert_eq!(body["attempts_remaining"], 3);
}

#[tokio::test]
async fn missing_password_field_counts_as_a_mismatch() {
    let router = test_app(Some("s3cr3t"));

    let (status, body) = send(&router, "POST", "/api/admin/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_secret");
    assert_eq!(body["attempts_remaining"], 2);
}

#[tokio::test]
async fn unset_admin_password_fails_closed() {
    let router = test_app(None);

    let (status, body) = login(&router, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_secret");

    let (status, _) = login(&router, "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn group_crud_and_pinning() {
    let router = test_app(Some("s3cr3t"));
    let token = admin_token(&router, "s3cr3t").await;

    for name in ["Alpha", "Beta", "Gamma"] {
        let (status, _) = send(
            &router,
            "POST",
            "/api/groups",
            Some(&token),
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Validation failures surface as 400.
    let (status, body) = send(
        &router,
        "POST",
        "/api/groups",
        Some(&token),
        Some(json!({ "name": "ab" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, _) = send(
        &router,
        "POST",
        "/api/groups/pin",
        Some(&token),
        Some(json!({ "group_id": 2, "pinned": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, "GET", "/api/groups", None, None).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Beta", "Alpha", "Gamma"]);

    let (status, body) = send(
        &router,
        "PUT",
        "/api/groups",
        Some(&token),
        Some(json!({ "id": 1, "name": "Alpha Prime", "url": "https://alpha.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"]["name"], "Alpha Prime");

    let (status, _) = send(&router, "DELETE", "/api/groups/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "DELETE", "/api/groups/99", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn search_ranks_name_hits_above_description_hits() {
    let router = test_app(Some("s3cr3t"));
    let token = admin_token(&router, "s3cr3t").await;

    let seed = [
        ("Python Society", "weekly coding nights"),
        ("Chess Club", "casual and rated play"),
        ("Robotics", "we build python-powered robots"),
    ];
    for (name, description) in seed {
        let (status, _) = send(
            &router,
            "POST",
            "/api/groups",
            Some(&token),
            Some(json!({ "name": name, "description": description })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, "GET", "/api/groups?q=python", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Python Society", "Robotics"]);

    // Typo tolerance comes from the edit-distance tier.
    let (_, body) = send(&router, "GET", "/api/groups?q=pythn", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Python Society");

    // Blank queries fall back to the full listing.
    let (_, body) = send(&router, "GET", "/api/groups?q=", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn important_links_crud() {
    let router = test_app(Some("s3cr3t"));
    let token = admin_token(&router, "s3cr3t").await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/important-links",
        Some(&token),
        Some(json!({ "title": "Handbook", "url": "https://handbook.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &router,
        "POST",
        "/api/important-links",
        Some(&token),
        Some(json!({ "title": "No URL" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (_, body) = send(&router, "GET", "/api/important-links", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &router,
        "PUT",
        "/api/important-links",
        Some(&token),
        Some(json!({ "id": 1, "title": "Student Handbook", "url": "https://handbook.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["link"]["title"], "Student Handbook");

    let (status, _) = send(
        &router,
        "DELETE",
        "/api/important-links/1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, "GET", "/api/important-links", None, None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn lockout_blocks_login_but_not_public_reads() {
    let router = test_app(Some("s3cr3t"));

    for _ in 0..3 {
        let _ = login(&router, "wrong").await;
    }

    let (status, _) = send(&router, "GET", "/api/groups", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "GET", "/api/important-links", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

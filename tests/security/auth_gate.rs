//! Admin gate tests: create and list with a wrong or missing admin token
//! must answer 401 and leave the store untouched.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

fn create_with_token(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/create")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("x-admin-token", token);
    }
    builder
        .body(Body::from(json!({ "owner": "mallory" }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_without_token_is_unauthorized() {
    let app = test_app();

    let (status, body) = app.send(create_with_token(None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
    assert!(app.store.load().is_empty());
}

#[tokio::test]
async fn test_create_with_wrong_token_is_unauthorized() {
    let app = test_app();

    for token in ["wrong", "test-admin-toke", "TEST-ADMIN-TOKEN"] {
        let (status, _) = app.send(create_with_token(Some(token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {:?} should be rejected", token);
    }
    assert!(app.store.load().is_empty());
}

#[tokio::test]
async fn test_create_with_wrong_body_token_is_unauthorized() {
    let app = test_app();

    let (status, _) = app
        .send(post_json(
            "/create",
            json!({ "owner": "mallory", "adminToken": "guess" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.store.load().is_empty());
}

#[tokio::test]
async fn test_header_token_takes_precedence_over_body() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("content-type", "application/json")
        .header("x-admin-token", "wrong")
        .body(Body::from(
            json!({ "owner": "mallory", "adminToken": ADMIN_TOKEN }).to_string(),
        ))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_without_token_is_unauthorized() {
    let app = test_app();
    app.create(json!({ "owner": "alice" })).await;

    let (status, body) = app.send(get("/list")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("error").is_some());
    assert!(body.as_array().is_none(), "no records may leak on 401");

    let (status, _) = app.send(get("/list?adminToken=wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_verify_does_not_mutate() {
    let app = test_app();
    let key = app.create(json!({ "owner": "alice", "ip": "10.0.0.1" })).await;
    let before = app.store.load();

    app.verify(json!({ "key": key, "ip": "10.0.0.2" })).await;
    app.verify(json!({ "key": "unknown" })).await;

    assert_eq!(app.store.load(), before);
}

#[tokio::test]
async fn test_token_whitespace_is_ignored_for_every_source() {
    let app = test_app();
    let padded = format!("  {}  ", ADMIN_TOKEN);

    let (status, _) = app.send(create_with_token(Some(&padded))).await;
    assert_eq!(status, StatusCode::OK, "header token");

    let (status, _) = app
        .send(post_json(
            "/create",
            json!({ "owner": "alice", "adminToken": padded }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "body token");

    let (status, body) = app
        .send(get(&format!("/list?adminToken=%20{}%20", ADMIN_TOKEN)))
        .await;
    assert_eq!(status, StatusCode::OK, "query token");
    assert_eq!(body.as_array().unwrap().len(), 2);
}

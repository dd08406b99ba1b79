//! Tests for the POST /create endpoint.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

#[tokio::test]
async fn test_create_returns_full_record() {
    let app = test_app();

    let (status, body) = app
        .send(admin_post(
            "/create",
            json!({ "owner": "alice", "ip": "10.0.0.1", "validityDays": 30 }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], true);
    let license = &body["license"];
    assert!(license["key"].as_str().is_some_and(|k| !k.is_empty()));
    assert_eq!(license["owner"], "alice");
    assert_eq!(license["boundIp"], "10.0.0.1");
    assert_eq!(license["createdAt"], START_MS);
    assert_eq!(license["expiresAt"], START_MS + 30 * ONE_DAY_MS);
    assert_eq!(license["active"], true);
    assert_eq!(license["notes"], "");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_create_persists_record() {
    let app = test_app();

    let key = app.create(json!({ "owner": "alice" })).await;

    let records = app.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, key);
    assert_eq!(records[0].owner, "alice");
}

#[tokio::test]
async fn test_create_with_empty_body_uses_defaults() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("x-admin-token", ADMIN_TOKEN)
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["license"]["owner"], DEFAULT_OWNER);
    assert_eq!(body["license"]["expiresAt"], serde_json::Value::Null);
    assert_eq!(body["license"]["boundIp"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_accepts_token_in_body() {
    let app = test_app();

    let (status, body) = app
        .send(post_json(
            "/create",
            json!({ "owner": "alice", "adminToken": ADMIN_TOKEN }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], true);
}

#[tokio::test]
async fn test_create_with_supplied_key() {
    let app = test_app();

    let key = app.create(json!({ "key": "OPERATOR-KEY-1" })).await;

    assert_eq!(key, "OPERATOR-KEY-1");
}

#[tokio::test]
async fn test_create_duplicate_key_is_conflict() {
    let app = test_app();
    app.create(json!({ "key": "DUP-1", "owner": "first" })).await;

    let (status, body) = app
        .send(admin_post("/create", json!({ "key": "DUP-1", "owner": "second" })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "created": false, "error": "key already exists" })
    );
    let records = app.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner, "first");
}

#[tokio::test]
async fn test_legacy_create_path_duplicate_is_conflict() {
    let app = test_app();
    app.create(json!({ "key": "DUP-2" })).await;

    let (status, body) = app
        .send(admin_post("/crear", json!({ "key": "DUP-2" })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "created": false, "error": "key already exists" })
    );
}

#[tokio::test]
async fn test_create_rejects_malformed_key() {
    let app = test_app();

    let (status, body) = app
        .send(admin_post("/create", json!({ "key": "two words" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");
    assert!(app.store.load().is_empty());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("content-type", "application/json")
        .header("x-admin-token", ADMIN_TOKEN)
        .body(Body::from("not json"))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_legacy_create_path_and_field_names() {
    let app = test_app();

    let (status, body) = app
        .send(admin_post(
            "/crear",
            json!({ "dueño": "Didier", "ip": "123.45.67.89", "diasValidez": "30" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let license = &body["license"];
    assert_eq!(license["owner"], "Didier");
    assert_eq!(license["boundIp"], "123.45.67.89");
    assert_eq!(license["expiresAt"], START_MS + 30 * ONE_DAY_MS);
}

//! Integration tests: status, auth (register/login), supplies CRUD, gratitude/testimonial feeds.
//!
//! Run with `cargo test`. Most tests use the in-memory store. The PostgreSQL
//! round trip needs `TEST_DATABASE_URL` and is skipped otherwise.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use relief_api::auth::JwtSecret;
use relief_api::db::{self, PgStore};
use relief_api::models::Collection;
use relief_api::repositories::MemoryStore;
use relief_api::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

const TOKEN_TTL: Duration = Duration::from_secs(3600);

fn jwt_secret() -> JwtSecret {
    JwtSecret::new("test-jwt-secret-min-32-chars!!".to_string(), TOKEN_TTL)
}

fn memory_app() -> (axum::Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        jwt_secret(),
    );
    (create_app(state), store)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(app: &axum::Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let res = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).expect("error body should be JSON"))
}

async fn register(app: &axum::Router, email: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({ "name": "Ada", "email": email, "password": password });
    send_json(app, "POST", "/api/auth/register", Some(body)).await
}

#[tokio::test]
async fn status_route_reports_running() {
    let (app, _) = memory_app();
    let (status, json) = send_json(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Server is running smoothly");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn register_twice_is_rejected() {
    let (app, store) = memory_app();

    let (status, json) = register(&app, "ada@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json, json!({ "success": true, "message": "User registered successfully" }));

    let (status, json) = register(&app, "ada@example.com", "other").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "success": false, "message": "User already exists" }));

    assert_eq!(store.users().await.len(), 1);
}

#[tokio::test]
async fn register_requires_all_fields() {
    let (app, store) = memory_app();
    let body = json!({ "name": "Ada", "email": "ada@example.com" });
    let (status, json) = send_json(&app, "POST", "/api/auth/register", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(store.users().await.is_empty());
}

#[tokio::test]
async fn register_rejects_unreadable_bodies_with_envelope() {
    let (app, store) = memory_app();

    let (status, json) = post_raw(
        &app,
        "/api/auth/register",
        Some("application/json"),
        r#"{"name":5,"email":"ada@example.com","password":"pw"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].is_string());

    let (status, json) = post_raw(&app, "/api/auth/register", None, "name=Ada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    assert!(store.users().await.is_empty());
}

#[tokio::test]
async fn login_returns_token_for_registered_email() {
    let (app, _) = memory_app();
    register(&app, "ada@example.com", "password123").await;

    let body = json!({ "email": "ada@example.com", "password": "password123" });
    let (status, json) = send_json(&app, "POST", "/api/auth/login", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Login successful");

    let token = json["token"].as_str().expect("response should contain token");
    let claims = jwt_secret().validate(token).unwrap();
    assert_eq!(claims.sub, "ada@example.com");
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL.as_secs() as i64);
}

#[tokio::test]
async fn login_failures_are_byte_identical() {
    let (app, _) = memory_app();
    register(&app, "ada@example.com", "password123").await;

    let wrong_password = json!({ "email": "ada@example.com", "password": "nope" });
    let unknown_email = json!({ "email": "ghost@example.com", "password": "password123" });
    let (status_a, body_a) = send(&app, "POST", "/api/auth/login", Some(wrong_password)).await;
    let (status_b, body_b) = send(&app, "POST", "/api/auth/login", Some(unknown_email)).await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
    let json: Value = serde_json::from_slice(&body_a).unwrap();
    assert_eq!(json, json!({ "message": "Invalid email or password" }));
}

#[tokio::test]
async fn password_never_stored_or_returned() {
    let (app, store) = memory_app();
    let (_, bytes) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert!(!String::from_utf8_lossy(&bytes).contains("s3cret-pass"));

    let (_, bytes) = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "ada@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert!(!String::from_utf8_lossy(&bytes).contains("s3cret-pass"));

    for user in store.users().await {
        assert!(!user.password_hash.contains("s3cret-pass"));
    }
}

#[tokio::test]
async fn supply_round_trip() {
    let (app, _) = memory_app();
    let supply = json!({ "title": "Rice", "quantity": 25, "category": "food" });

    let (status, created) = send_json(&app, "POST", "/supplies", Some(supply)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["_id"].as_str().unwrap().to_string();

    let (status, fetched) = send_json(&app, "GET", &format!("/supplies/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Rice");
    assert_eq!(fetched["quantity"], 25);
    assert_eq!(fetched["category"], "food");
    assert_eq!(fetched, created);

    let (status, list) = send_json(&app, "GET", "/supplies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn supply_update_and_delete() {
    let (app, _) = memory_app();
    let (_, created) = send_json(
        &app,
        "POST",
        "/supplies",
        Some(json!({ "title": "Tents", "quantity": 4, "category": "shelter" })),
    )
    .await;
    let uri = format!("/supplies/{}", created["_id"].as_str().unwrap());

    let update = json!({ "title": "Tents", "quantity": 6, "category": "shelter" });
    let (status, json) = send_json(&app, "PUT", &uri, Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Supply updated successfully");

    // Same values again: nothing modified.
    let (status, json) = send_json(&app, "PUT", &uri, Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Supply not found");

    let (_, fetched) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(fetched["quantity"], 6);

    let (status, json) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Document deleted successfully");

    let (status, json) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Supply not found");
}

#[tokio::test]
async fn supply_update_replaces_array_with_subset() {
    let (app, _) = memory_app();
    let (_, created) = send_json(
        &app,
        "POST",
        "/supplies",
        Some(json!({ "title": "Kit", "quantity": 1, "category": ["food", "water"] })),
    )
    .await;
    let uri = format!("/supplies/{}", created["_id"].as_str().unwrap());

    let update = json!({ "title": "Kit", "quantity": 1, "category": ["food"] });
    let (status, _) = send_json(&app, "PUT", &uri, Some(update)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(fetched["category"], json!(["food"]));
}

#[tokio::test]
async fn supply_create_rejects_unreadable_body() {
    let (app, store) = memory_app();
    let (status, json) = post_raw(&app, "/supplies", Some("application/json"), "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(store.len(Collection::Supplies).await, 0);
}

#[tokio::test]
async fn supply_id_with_padding_is_invalid() {
    let (app, _) = memory_app();
    let (_, created) = send_json(&app, "POST", "/supplies", Some(json!({ "title": "Soap" }))).await;
    let uri = format!("/supplies/%20{}", created["_id"].as_str().unwrap());
    let (status, json) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid ID" }));
}

#[tokio::test]
async fn delete_with_invalid_id_never_reaches_store() {
    let (app, store) = memory_app();
    send_json(&app, "POST", "/supplies", Some(json!({ "title": "Soap" }))).await;

    let (status, json) = send_json(&app, "DELETE", "/supplies/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid ID" }));
    assert_eq!(store.len(Collection::Supplies).await, 1);

    let absent = uuid::Uuid::new_v4();
    let (status, json) = send_json(&app, "DELETE", &format!("/supplies/{}", absent), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "Document not found" }));
}

#[tokio::test]
async fn invalid_id_on_get_and_put() {
    let (app, _) = memory_app();
    let (status, _) = send_json(&app, "GET", "/supplies/123", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send_json(&app, "PUT", "/supplies/123", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gratitude_feed() {
    let (app, _) = memory_app();
    let (status, json) = send_json(
        &app,
        "POST",
        "/create-gratitude",
        Some(json!({ "name": "Grace", "message": "Thank you for the blankets" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Gratitude created successfully");
    assert_eq!(json["data"]["acknowledged"], true);
    let inserted = json["data"]["insertedId"].as_str().unwrap().to_string();

    let (status, json) = send_json(&app, "GET", "/gratitudes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Successfully retrieved gratitudes data");
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["_id"], inserted.as_str());
    assert_eq!(data[0]["name"], "Grace");
}

#[tokio::test]
async fn testimonial_feed() {
    let (app, store) = memory_app();
    let (status, json) = send_json(
        &app,
        "POST",
        "/create-testimonial",
        Some(json!({ "author": "Sam", "text": "Fast delivery" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Testimonial created successfully");

    let (status, json) = send_json(&app, "GET", "/testimonial", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Successfully retrieved testimonial data");
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(store.len(Collection::Gratitude).await, 0);
}

#[tokio::test]
async fn testimonial_rejects_non_object() {
    let (app, _) = memory_app();
    let (status, json) = send_json(&app, "POST", "/create-testimonial", Some(json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "success": false, "message": "Testimonial create failed" }));
}

#[tokio::test]
async fn feeds_reject_unreadable_bodies_with_envelope() {
    let (app, store) = memory_app();

    let (status, json) = post_raw(&app, "/create-gratitude", None, r#"{"note":"thanks"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "success": false, "message": "Gratitude create failed" }));

    let (status, json) = post_raw(&app, "/create-testimonial", Some("application/json"), "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "success": false, "message": "Testimonial create failed" }));

    assert_eq!(store.len(Collection::Gratitude).await, 0);
    assert_eq!(store.len(Collection::Testimonial).await, 0);
}

async fn postgres_app() -> Option<axum::Router> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skip integration test: set TEST_DATABASE_URL");
            return None;
        }
    };
    let pool = match db::create_pool(&database_url).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Skip integration test: {}", e);
            return None;
        }
    };
    db::ensure_schema(&pool).await.unwrap();
    let store = Arc::new(PgStore::new(pool));
    Some(create_app(AppState::new(store.clone(), store, jwt_secret())))
}

#[tokio::test]
async fn postgres_update_replaces_array_with_subset() {
    let Some(app) = postgres_app().await else {
        return;
    };
    let (status, created) = send_json(
        &app,
        "POST",
        "/supplies",
        Some(json!({ "title": "Kit", "quantity": 1, "category": ["food", "water"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/supplies/{}", created["_id"].as_str().unwrap());

    let update = json!({ "title": "Kit", "quantity": 1, "category": ["food"] });
    let (status, json) = send_json(&app, "PUT", &uri, Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK, "array subset must still count as a change: {}", json);

    let (_, fetched) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(fetched["category"], json!(["food"]));

    let (status, _) = send_json(&app, "PUT", &uri, Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send_json(&app, "DELETE", &uri, None).await;
}

#[tokio::test]
async fn postgres_register_login_and_supplies() {
    let Some(app) = postgres_app().await else {
        return;
    };

    let email = format!("test-{}@example.com", uuid::Uuid::new_v4());
    let (status, _) = register(&app, &email, "password123").await;
    assert_eq!(status, StatusCode::CREATED, "register should succeed");
    let (status, _) = register(&app, &email, "password123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "second register should fail");

    let login_body = json!({ "email": email, "password": "password123" });
    let (status, json) = send_json(&app, "POST", "/api/auth/login", Some(login_body)).await;
    assert_eq!(status, StatusCode::OK, "login should succeed");
    assert!(json["token"].as_str().is_some(), "response should contain token");

    let (status, created) = send_json(
        &app,
        "POST",
        "/supplies",
        Some(json!({ "title": "Water", "quantity": 40, "category": "drink" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/supplies/{}", created["_id"].as_str().unwrap());

    let (status, fetched) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["quantity"], 40);

    let unchanged = json!({ "title": "Water", "quantity": 40, "category": "drink" });
    let (status, _) = send_json(&app, "PUT", &uri, Some(unchanged)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

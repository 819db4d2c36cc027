use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::TimeDelta;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::TokenKeys;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    server::router(
        engine,
        TokenKeys::new(b"test-secret", TimeDelta::minutes(15)),
    )
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let credentials = json!({ "username": username, "password": password });
    let (status, _) = send(app, Method::POST, "/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(app, Method::POST, "/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_category(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/categories",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], name);
    body["id"].as_i64().unwrap()
}

async fn create_item(app: &Router, token: &str, category_id: i64, title: &str, amount: f64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/items",
        Some(token),
        Some(json!({
            "title": title,
            "amount": amount,
            "type": "expense",
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Item created");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn index_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Budget Tracker API" }));
}

#[tokio::test]
async fn registering_same_username_twice_conflicts() {
    let app = app().await;
    let credentials = json!({ "username": "alice", "password": "password" });

    let (status, body) =
        send(&app, Method::POST, "/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered");

    let (status, body) = send(&app, Method::POST, "/register", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");
}

#[tokio::test]
async fn login_issues_token_only_for_correct_password() {
    let app = app().await;
    let token = register_and_login(&app, "alice", "password").await;
    assert!(!token.is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_valid_token() {
    let app = app().await;

    for uri in ["/categories", "/items", "/shared"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(body["error"].is_string());
    }

    let (status, _) = send(&app, Method::GET, "/categories", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = TokenKeys::new(b"other-secret", TimeDelta::minutes(15))
        .issue(1)
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/categories", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn categories_are_not_visible_to_other_users() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "password").await;
    let bob = register_and_login(&app, "bob", "password123").await;

    let food = create_category(&app, &alice, "Food").await;

    let (status, body) = send(&app, Method::GET, "/categories", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": food, "name": "Food" }]));

    let (status, body) = send(&app, Method::GET, "/categories", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/categories/{food}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparsable_category_id_is_not_found() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "password").await;

    for uri in ["/categories/abc", "/categories/99999999999"] {
        let (status, body) = send(&app, Method::DELETE, uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "Category not found" }), "{uri}");
    }
}

#[tokio::test]
async fn token_for_missing_user_is_rejected() {
    let app = app().await;
    let token = TokenKeys::new(b"test-secret", TimeDelta::minutes(15))
        .issue(999)
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/categories", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unknown user" }));
}

#[tokio::test]
async fn item_needs_callers_category_and_accepts_form_strings() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "password").await;
    let bob = register_and_login(&app, "bob", "password123").await;
    let rent = create_category(&app, &alice, "Rent").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/items",
        Some(&bob),
        Some(json!({ "title": "Rent", "amount": 800, "type": "expense", "category_id": rent })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid category");

    let (status, _) = send(
        &app,
        Method::POST,
        "/items",
        Some(&alice),
        Some(json!({
            "title": "Apartment Rent",
            "amount": "800.50",
            "type": "expense",
            "category_id": rent.to_string(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/items", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Apartment Rent");
    assert_eq!(items[0]["amount"], 800.5);
    assert_eq!(items[0]["type"], "expense");
    assert_eq!(items[0]["category"], "Rent");
    assert!(items[0]["created_at"].is_string());

    let (_, body) = send(&app, Method::GET, "/items", Some(&bob), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn shared_budget_validates_item_and_percentage() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "password").await;
    let bob = register_and_login(&app, "bob", "password123").await;
    let rent = create_category(&app, &alice, "Rent").await;
    let item = create_item(&app, &alice, rent, "Apartment Rent", 800.0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/shared",
        Some(&bob),
        Some(json!({ "budget_item_id": 999, "contribution_percent": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/shared",
        Some(&bob),
        Some(json!({ "budget_item_id": item, "contribution_percent": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Contribution must be 0-100");

    let (status, body) = send(
        &app,
        Method::POST,
        "/shared",
        Some(&bob),
        Some(json!({ "budget_item_id": item, "contribution_percent": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Shared budget added");

    let (status, _) = send(
        &app,
        Method::POST,
        "/shared",
        Some(&bob),
        Some(json!({ "budget_item_id": item, "contribution_percent": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/shared", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "item": "Apartment Rent",
            "amount": 800.0,
            "type": "expense",
            "contribution_percent": 50.0,
        }])
    );
}

#[tokio::test]
async fn deleting_category_removes_items_and_shares() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "password").await;
    let bob = register_and_login(&app, "bob", "password123").await;
    let rent = create_category(&app, &alice, "Rent").await;
    let item = create_item(&app, &alice, rent, "Apartment Rent", 800.0).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/shared",
        Some(&bob),
        Some(json!({ "budget_item_id": item, "contribution_percent": 25 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/categories/{rent}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = send(&app, Method::GET, "/items", Some(&alice), None).await;
    assert_eq!(body, json!([]));
    let (_, body) = send(&app, Method::GET, "/shared", Some(&bob), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

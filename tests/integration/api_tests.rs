//! API integration tests against a running server

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

const SERVER_URL: &str = "http://localhost:8080";
const BASE_URL: &str = "http://localhost:8080/api/v1";
const API_USER: &str = "admin";

fn authed(builder: RequestBuilder) -> RequestBuilder {
    builder.header("X-API-User-Name", API_USER)
}

/// Name that does not collide with earlier runs
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{} {}", prefix, nanos)
}

async fn create_author(client: &Client, name: &str) -> Value {
    let response = authed(client.post(format!("{}/authors", BASE_URL)))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", SERVER_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_missing_api_user_is_forbidden() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"], "Forbidden");
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = Client::new();
    let name = unique("Author");

    let author = create_author(&client, &name).await;
    let id = author["id"].as_i64().expect("No id in response");
    assert_eq!(author["name"], name.as_str());
    assert_eq!(author["books"], 0);

    let response = authed(client.get(format!("{}/authors/{}", BASE_URL, id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let renamed = unique("Renamed");
    let response = authed(client.put(format!("{}/authors/{}", BASE_URL, id)))
        .json(&json!({ "name": renamed }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], renamed.as_str());

    let response = authed(client.delete(format!("{}/authors/{}", BASE_URL, id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = authed(client.get(format!("{}/authors/{}", BASE_URL, id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_author_is_rejected() {
    let client = Client::new();
    let name = unique("Duplicate");
    create_author(&client, &name).await;

    let response = authed(client.post(format!("{}/authors", BASE_URL)))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"]["author"][0], "This author already exists");
}

#[tokio::test]
#[ignore]
async fn test_invalid_author_name() {
    let client = Client::new();

    let response = authed(client.post(format!("{}/authors", BASE_URL)))
        .json(&json!({ "name": "x" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"]["name"][0], "Name must be at least 2 characters");
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();
    let name = unique("Writer");
    let author = create_author(&client, &name).await;
    let author_id = author["id"].as_i64().expect("No id in response");

    // by author name
    let response = authed(client.post(format!("{}/books", BASE_URL)))
        .json(&json!({ "title": "First book", "author": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["data"]["id"].as_i64().expect("No id in response");
    assert_eq!(body["data"]["author"], name.as_str());

    // same title, same author
    let response = authed(client.post(format!("{}/books", BASE_URL)))
        .json(&json!({ "title": "First book", "author": author_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = authed(client.put(format!("{}/books/{}", BASE_URL, book_id)))
        .json(&json!({ "title": "Second edition" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["title"], "Second edition");

    let response = authed(client.get(format!("{}/authors/{}/books", BASE_URL, author_id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["books"][0]["id"], book_id);

    let response = authed(client.delete(format!("{}/books/{}", BASE_URL, book_id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    authed(client.delete(format!("{}/authors/{}", BASE_URL, author_id)))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_book_for_unknown_author() {
    let client = Client::new();

    let response = authed(client.post(format!("{}/books", BASE_URL)))
        .json(&json!({ "title": "Orphan", "author": i32::MAX }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"], "Author not found");
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination() {
    let client = Client::new();

    let response = authed(client.get(format!("{}/books?page=1&pageSize=5", BASE_URL)))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["pageSize"], 5);
    assert!(body["books"].as_array().expect("books is not an array").len() <= 5);
}

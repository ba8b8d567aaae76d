mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, create_post, server, sign_in};

#[tokio::test]
async fn test_index_is_public_and_populates_owner() {
	let server = server();
	let (alice, token) = sign_in(&server, "alice@example.com").await;

	create_post(&server, &token, "first", "hello").await;

	let response = server.get("/posts").await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<Value>();
	let posts = body["posts"].as_array().unwrap();

	assert_eq!(posts.len(), 1);
	assert_eq!(posts[0]["title"], "first");
	assert_eq!(posts[0]["owner"]["id"], alice.as_str());
	assert_eq!(posts[0]["owner"]["email"], "alice@example.com");
	assert!(posts[0]["owner"].get("password").is_none());
}

#[tokio::test]
async fn test_myposts_returns_only_own_posts() {
	let server = server();
	let (alice, alice_token) = sign_in(&server, "alice@example.com").await;
	let (_, bob_token) = sign_in(&server, "bob@example.com").await;

	let mut expected = Vec::new();

	expected.push(create_post(&server, &alice_token, "a1", "").await);
	create_post(&server, &bob_token, "b1", "").await;
	expected.push(create_post(&server, &alice_token, "a2", "").await);
	create_post(&server, &bob_token, "b2", "").await;

	let response = bearer(server.get("/myposts"), &alice_token).await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<Value>();
	let posts = body["posts"].as_array().unwrap();
	let ids = posts
		.iter()
		.map(|post| post["id"].as_str().unwrap().to_owned())
		.collect::<Vec<_>>();

	assert_eq!(ids, expected);
	assert!(posts.iter().all(|post| post["owner"]["id"] == alice.as_str()));

	let all = server.get("/posts").await.json::<Value>();

	assert_eq!(all["posts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_myposts_requires_token() {
	let server = server();

	let response = server.get("/myposts").await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "missing_token");

	let response = bearer(server.get("/myposts"), &Uuid::new_v4().to_string()).await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "invalid_token");
}

#[tokio::test]
async fn test_create_ignores_client_owner() {
	let server = server();
	let (alice, token) = sign_in(&server, "alice@example.com").await;
	let (bob, _) = sign_in(&server, "bob@example.com").await;

	let response = bearer(server.post("/posts"), &token)
		.json(&json!({ "post": { "title": "x", "owner": bob } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	let body = response.json::<Value>();
	let post = &body["post"];

	assert_eq!(post["owner"], alice.as_str());
	assert_eq!(post["title"], "x");
	assert_eq!(post["body"], "");
	assert!(post["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_requires_token() {
	let server = server();

	let response = server
		.post("/posts")
		.json(&json!({ "post": { "title": "x" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	assert!(server.get("/posts").await.json::<Value>()["posts"]
		.as_array()
		.unwrap()
		.is_empty());
}

#[tokio::test]
async fn test_create_validates_title() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;

	let response = bearer(server.post("/posts"), &token)
		.json(&json!({ "post": { "title": "" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(response.json::<Value>()["errors"][0]["field"], "post.title");

	let response = bearer(server.post("/posts"), &token)
		.json(&json!({ "post": { "body": "no title" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_show_returns_latest_fields() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;
	let id = create_post(&server, &token, "draft", "v1").await;

	let response = server.get(&format!("/posts/{id}")).await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert_eq!(response.json::<Value>()["post"]["body"], "v1");

	let response = bearer(server.patch(&format!("/posts/{id}")), &token)
		.json(&json!({ "post": { "title": "final", "body": "v2" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
	assert!(response.text().is_empty());

	let body = server.get(&format!("/posts/{id}")).await.json::<Value>();
	let post = &body["post"];

	assert_eq!(post["title"], "final");
	assert_eq!(post["body"], "v2");
}

#[tokio::test]
async fn test_show_unknown_post() {
	let server = server();

	let response = server.get(&format!("/posts/{}", Uuid::new_v4())).await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "unknown_post");
}

#[tokio::test]
async fn test_update_strips_blank_fields() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;
	let id = create_post(&server, &token, "keep me", "old").await;

	let response = bearer(server.patch(&format!("/posts/{id}")), &token)
		.json(&json!({ "post": { "title": "", "body": "hi" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let body = server.get(&format!("/posts/{id}")).await.json::<Value>();
	let post = &body["post"];

	assert_eq!(post["title"], "keep me");
	assert_eq!(post["body"], "hi");
}

#[tokio::test]
async fn test_update_cannot_change_owner() {
	let server = server();
	let (alice, token) = sign_in(&server, "alice@example.com").await;
	let (bob, _) = sign_in(&server, "bob@example.com").await;
	let id = create_post(&server, &token, "mine", "").await;

	let response = bearer(server.patch(&format!("/posts/{id}")), &token)
		.json(&json!({ "post": { "owner": bob, "text": "still mine" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let body = server.get(&format!("/posts/{id}")).await.json::<Value>();
	let post = &body["post"];

	assert_eq!(post["owner"], alice.as_str());
	assert_eq!(post["body"], "still mine");
}

#[tokio::test]
async fn test_non_owner_cannot_mutate() {
	let server = server();
	let (_, alice_token) = sign_in(&server, "alice@example.com").await;
	let (_, bob_token) = sign_in(&server, "bob@example.com").await;
	let id = create_post(&server, &alice_token, "alice's", "untouched").await;

	let response = bearer(server.patch(&format!("/posts/{id}")), &bob_token)
		.json(&json!({ "post": { "body": "defaced" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "not_post_owner");

	let response = bearer(server.delete(&format!("/posts/{id}")), &bob_token).await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

	let response = server.get(&format!("/posts/{id}")).await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<Value>();
	let post = &body["post"];

	assert_eq!(post["title"], "alice's");
	assert_eq!(post["body"], "untouched");
}

#[tokio::test]
async fn test_mutations_require_token() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;
	let id = create_post(&server, &token, "title", "").await;

	let response = server
		.patch(&format!("/posts/{id}"))
		.json(&json!({ "post": { "body": "x" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

	let response = server.delete(&format!("/posts/{id}")).await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_post() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;
	let id = create_post(&server, &token, "short lived", "").await;

	let response = bearer(server.delete(&format!("/posts/{id}")), &token).await;

	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let response = server.get(&format!("/posts/{id}")).await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_post_is_not_found() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;

	let response = bearer(server.delete(&format!("/posts/{}", Uuid::new_v4())), &token).await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

	let response = bearer(server.patch(&format!("/posts/{}", Uuid::new_v4())), &token)
		.json(&json!({ "post": { "body": "x" } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id() {
	let server = server();

	let response = server.get("/posts/not-an-id").await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "invalid_path");
}

#[tokio::test]
async fn test_non_owner_with_invalid_body_is_unauthorized() {
	let server = server();
	let (_, alice_token) = sign_in(&server, "alice@example.com").await;
	let (_, bob_token) = sign_in(&server, "bob@example.com").await;
	let id = create_post(&server, &alice_token, "alice's", "").await;

	let response = bearer(server.patch(&format!("/posts/{id}")), &bob_token)
		.json(&json!({ "post": { "title": "x".repeat(300) } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "not_post_owner");

	let response = bearer(server.patch(&format!("/posts/{id}")), &bob_token)
		.json(&json!({ "post": { "title": 5 } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_post_with_invalid_body_is_not_found() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;

	let response = bearer(server.patch(&format!("/posts/{}", Uuid::new_v4())), &token)
		.json(&json!({ "post": { "title": 5 } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	assert_eq!(response.json::<Value>()["errors"][0]["code"], "unknown_post");
}

#[tokio::test]
async fn test_owner_invalid_update_is_rejected() {
	let server = server();
	let (_, token) = sign_in(&server, "alice@example.com").await;
	let id = create_post(&server, &token, "original", "").await;

	let response = bearer(server.patch(&format!("/posts/{id}")), &token)
		.json(&json!({ "post": { "title": "x".repeat(300) } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(response.json::<Value>()["errors"][0]["field"], "post.title");

	let response = bearer(server.patch(&format!("/posts/{id}")), &token)
		.json(&json!({ "post": { "title": 5 } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

	let body = server.get(&format!("/posts/{id}")).await.json::<Value>();

	assert_eq!(body["post"]["title"], "original");
}

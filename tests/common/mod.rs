use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use postboard::{store::MemoryStore, AppState};
use serde_json::{json, Value};

pub fn server() -> TestServer {
	let state = AppState::new(Arc::new(MemoryStore::new()));

	TestServer::new(postboard::app(state)).unwrap()
}

/// Adds `Authorization: Bearer <token>` to the request.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
	request.add_header(
		header::AUTHORIZATION,
		HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
	)
}

/// Signs up and signs in, returning the user id and bearer token.
pub async fn sign_in(server: &TestServer, email: &str) -> (String, String) {
	let response = server
		.post("/sign-up")
		.json(&json!({
			"credentials": {
				"email": email,
				"password": "correct horse",
				"passwordConfirmation": "correct horse",
			}
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	let response = server
		.post("/sign-in")
		.json(&json!({
			"credentials": { "email": email, "password": "correct horse" }
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	let body = response.json::<Value>();

	(
		body["user"]["id"].as_str().unwrap().to_owned(),
		body["token"].as_str().unwrap().to_owned(),
	)
}

/// Creates a post as the token's user, returning its id.
pub async fn create_post(server: &TestServer, token: &str, title: &str, body: &str) -> String {
	let response = bearer(server.post("/posts"), token)
		.json(&json!({ "post": { "title": title, "body": body } }))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	response.json::<Value>()["post"]["id"]
		.as_str()
		.unwrap()
		.to_owned()
}

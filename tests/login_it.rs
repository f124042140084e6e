mod support;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use support::*;
use threads_relay::{_preludet::*, error::Error};

#[tokio::test]
async fn exchange_code_resolves_the_identity_it_was_issued_for() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/access_token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("grant_type=authorization_code")
				.body_includes("code=code-123")
				.body_includes("client_id=client-test")
				.body_includes("client_secret=secret-test");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-short\",\"user_id\":17841400000,\"permissions\":[]}");
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/graph/17841400000")
				.query_param("fields", "id,username")
				.query_param("access_token", "IGQ-short");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"17841400000\",\"username\":\"relay_user\"}");
		})
		.await;
	let outcome = build_test_broker(&server.base_url())
		.exchange_code("code-123")
		.await
		.expect("Code exchange should succeed.");

	assert_eq!(outcome.access_token.expose(), "IGQ-short");
	assert_eq!(outcome.user.id.as_ref(), "17841400000");
	assert_eq!(outcome.user.username, "relay_user");
	assert!(!format!("{outcome:?}").contains("IGQ-short"), "Debug output must redact tokens.");

	token.assert_async().await;
	identity.assert_async().await;
}

#[tokio::test]
async fn empty_code_is_rejected_locally() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body("{}");
		})
		.await;
	let err = build_test_broker(&server.base_url())
		.exchange_code("")
		.await
		.expect_err("Empty codes must fail.");

	assert!(matches!(
		err,
		Error::BadRequest { ref reason } if reason == "Authorization code missing"
	));

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_code_collapses_to_login_failure() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(400).header("content-type", "application/json").body(
				"{\"error_type\":\"OAuthException\",\"code\":400,\"error_message\":\"This authorization code has been used\"}",
			);
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(200).body("{}");
		})
		.await;
	let err = build_test_broker(&server.base_url())
		.exchange_code("stale-code")
		.await
		.expect_err("Reused code fails.");

	assert!(matches!(err, Error::AuthExchangeFailed));
	assert_eq!(err.public_message(), "Instagram login failed");

	token.assert_calls_async(1).await;
	identity.assert_calls_async(0).await;
}

#[tokio::test]
async fn malformed_identity_collapses_to_login_failure() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-short\",\"user_id\":\"42\"}");
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/42");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"42\"}");
		})
		.await;
	let err = build_test_broker(&server.base_url())
		.exchange_code("code")
		.await
		.expect_err("Missing username fails.");

	assert!(matches!(err, Error::AuthExchangeFailed));

	identity.assert_calls_async(1).await;
}

#[tokio::test]
async fn login_route_round_trips_the_mocked_identity() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").body_includes("code=route-code");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-route\",\"user_id\":555}");
		})
		.await;
	let _identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/555").query_param("access_token", "IGQ-route");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"555\",\"username\":\"route_user\"}");
		})
		.await;
	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);
	let response = app.post("/instagram").json(&json!({ "code": "route-code" })).await;

	assert_eq!(response.status_code(), 200);
	assert_eq!(
		response.json::<Value>(),
		json!({ "access_token": "IGQ-route", "user": { "id": "555", "username": "route_user" } })
	);
}

#[tokio::test]
async fn login_route_requires_a_code() {
	let server = MockServer::start_async().await;
	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);

	for body in [json!({}), json!({ "code": "" }), json!({ "code": null })] {
		let response = app.post("/instagram").json(&body).await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["message"], "Authorization code missing");
	}

	let response = app.post("/instagram").text("not json").await;

	assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn codes_are_forwarded_verbatim() {
	let server = MockServer::start_async().await;
	let padded = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").body_includes("code=+padded+");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-padded\",\"user_id\":7}");
		})
		.await;
	let numeric = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").body_includes("code=123");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-numeric\",\"user_id\":7}");
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/7");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"7\",\"username\":\"verbatim\"}");
		})
		.await;
	let outcome = build_test_broker(&server.base_url())
		.exchange_code(" padded ")
		.await
		.expect("Whitespace is part of the code.");

	assert_eq!(outcome.access_token.expose(), "IGQ-padded");

	padded.assert_calls_async(1).await;

	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);
	let response = app.post("/instagram").json(&json!({ "code": 123 })).await;

	assert_eq!(response.status_code(), 200);
	assert_eq!(response.json::<Value>()["access_token"], "IGQ-numeric");

	numeric.assert_calls_async(1).await;
	identity.assert_calls_async(2).await;
}

mod support;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use support::*;
use threads_relay::{
	_preludet::*,
	auth::{ACCESS_TOKEN_HEADER, AccessToken, CredentialContext, UserId},
	error::Error,
	flows::GraphBroker,
};

fn context() -> CredentialContext {
	CredentialContext::new(
		AccessToken::new(ACCESS_TOKEN),
		UserId::new(TEST_USER_ID).expect("User fixture should be valid."),
	)
}

#[tokio::test]
async fn profile_route_returns_the_raw_profile_object() {
	let server = MockServer::start_async().await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/graph/me")
				.query_param("fields", "id,username,account_type,media_count")
				.query_param("access_token", ACCESS_TOKEN);
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":\"17841400000\",\"username\":\"relay_user\",\"account_type\":\"BUSINESS\",\"media_count\":12}",
			);
		})
		.await;
	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);
	let response = app.get("/profile").add_header(ACCESS_TOKEN_HEADER, ACCESS_TOKEN).await;

	assert_eq!(response.status_code(), 200);
	assert_eq!(
		response.json::<Value>(),
		json!({
			"id": "17841400000",
			"username": "relay_user",
			"account_type": "BUSINESS",
			"media_count": 12
		})
	);

	profile.assert_async().await;
}

#[tokio::test]
async fn profile_failures_are_opaque() {
	let server = MockServer::start_async().await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/me");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":{\"message\":\"Invalid OAuth access token - Cannot parse access token\"}}");
		})
		.await;
	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);
	let response = app.get("/profile").add_header(ACCESS_TOKEN_HEADER, "garbage").await;

	assert_eq!(response.status_code(), 500);

	let body = response.json::<Value>();

	assert_eq!(body, json!({ "message": "Could not retrieve Instagram profile" }));

	profile.assert_calls_async(1).await;

	let response = app.get("/profile").await;

	assert_eq!(response.status_code(), 401);

	profile.assert_calls_async(1).await;
}

#[tokio::test]
async fn non_object_profiles_are_rejected() {
	let server = MockServer::start_async().await;
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/me");
			then.status(200).header("content-type", "application/json").body("[1,2,3]");
		})
		.await;
	let err = build_test_broker(&server.base_url())
		.fetch_profile(&context())
		.await
		.expect_err("Arrays are not profiles.");

	assert!(matches!(err, Error::ProfileFetchFailed));
}

#[tokio::test]
async fn refresh_route_returns_the_renewed_token() {
	let server = MockServer::start_async().await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/graph/refresh_access_token")
				.query_param("grant_type", "ig_refresh_token")
				.query_param("access_token", "IGQ-old");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"IGQ-new\",\"token_type\":\"bearer\",\"expires_in\":5183944}");
		})
		.await;
	let (_root, staging) = staging_dir();
	let app = app(&server, &staging);
	let response = app.get("/refresh-token").add_header(ACCESS_TOKEN_HEADER, "IGQ-old").await;

	assert_eq!(response.status_code(), 200);
	assert_eq!(response.json::<Value>(), json!({ "access_token": "IGQ-new" }));

	refresh.assert_async().await;
}

#[tokio::test]
async fn refresh_failures_collapse() {
	let server = MockServer::start_async().await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/refresh_access_token");
			then.status(400)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body("{\"error\":{\"message\":\"Token too young\"}}");
		})
		.await;
	let err = build_test_broker(&server.base_url())
		.refresh_access_token(&AccessToken::new("IGQ-young"))
		.await
		.expect_err("Upstream rejection should surface.");

	assert!(matches!(err, Error::RefreshFailed));
	assert_eq!(err.public_message(), "Failed to refresh token");

	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn elapsed_timeout_is_a_remote_failure() {
	let server = MockServer::start_async().await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/me");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"1\"}")
				.delay(std::time::Duration::from_secs(2));
		})
		.await;
	let client = test_reqwest_http_client_with_timeout(std::time::Duration::from_millis(200));
	let bounded = GraphBroker { http_client: client, ..build_test_broker(&server.base_url()) };
	let err = bounded.fetch_profile(&context()).await.expect_err("Slow upstream should time out.");

	assert!(matches!(err, Error::ProfileFetchFailed));

	profile.assert_calls_async(1).await;
}

#[tokio::test]
async fn default_broker_does_not_follow_redirects() {
	let server = MockServer::start_async().await;
	let base = format!("http://{}", server.address());
	let elsewhere = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/elsewhere");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"1\"}");
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/graph/me");
			then.status(302).header("location", format!("{base}/graph/elsewhere"));
		})
		.await;
	let broker = GraphBroker::new(
		mock_descriptor(&base),
		oauth2::ClientId::new(TEST_CLIENT_ID.into()),
		oauth2::ClientSecret::new(TEST_CLIENT_SECRET.into()),
		oauth2::RedirectUrl::new(TEST_REDIRECT_URI.into()).expect("Redirect fixture should parse."),
	)
	.expect("Default broker should build.");
	let err = broker.fetch_profile(&context()).await.expect_err("Redirects must not be followed.");

	assert!(matches!(err, Error::ProfileFetchFailed));

	profile.assert_calls_async(1).await;
	elsewhere.assert_calls_async(0).await;
}

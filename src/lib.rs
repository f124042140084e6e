//! Instagram Login + Threads publishing relay: OAuth code exchange, profile lookups, token
//! refresh, and two-phase media publishing with guaranteed upload cleanup, behind a small axum
//! service.

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod server;
pub mod upload;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::{path::Path, time::Duration as StdDuration};
	// crates.io
	use oauth2::{ClientId, ClientSecret, RedirectUrl};
	// self
	use crate::{
		auth::UserId,
		flows::GraphBroker,
		http::ReqwestHttpClient,
		provider::GraphDescriptor,
		server::AppState,
		upload::StagingArea,
	};

	/// Client id registered by test brokers.
	pub const TEST_CLIENT_ID: &str = "client-test";
	/// Client secret registered by test brokers.
	pub const TEST_CLIENT_SECRET: &str = "secret-test";
	/// Redirect URI registered by test brokers.
	pub const TEST_REDIRECT_URI: &str = "https://relay.example.com/auth/callback";
	/// Default user id carried by test state.
	pub const TEST_USER_ID: &str = "17841400000";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		test_reqwest_http_client_with_timeout(ReqwestHttpClient::DEFAULT_TIMEOUT)
	}

	/// Same as [`test_reqwest_http_client`] but abandons each call after `timeout`.
	pub fn test_reqwest_http_client_with_timeout(timeout: StdDuration) -> ReqwestHttpClient {
		let client = ReqwestHttpClient::builder(timeout)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Descriptor whose endpoints all live under `base` (e.g. a mock server URL).
	///
	/// Paths: `/oauth/authorize`, `/oauth/access_token`, `/graph`, and `/threads/v1.0`.
	pub fn mock_descriptor(base: &str) -> GraphDescriptor {
		let url = |path: &str| {
			Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
				.expect("Mock endpoint URL should parse.")
		};

		GraphDescriptor::builder()
			.authorization_endpoint(url("/oauth/authorize"))
			.token_endpoint(url("/oauth/access_token"))
			.graph_base(url("/graph"))
			.threads_base(url("/threads/v1.0"))
			.build()
			.expect("Mock descriptor should validate.")
	}

	/// Broker pointed at `base` with the test client registration.
	pub fn build_test_broker(base: &str) -> GraphBroker {
		GraphBroker::with_http_client(
			mock_descriptor(base),
			ClientId::new(TEST_CLIENT_ID.into()),
			ClientSecret::new(TEST_CLIENT_SECRET.into()),
			RedirectUrl::new(TEST_REDIRECT_URI.into()).expect("Test redirect URI should parse."),
			test_reqwest_http_client(),
		)
	}

	/// Full application state pointed at `base`, staging uploads under `staging_dir`.
	pub fn build_test_state(base: &str, staging_dir: &Path) -> AppState {
		AppState::new(
			build_test_broker(base),
			UserId::new(TEST_USER_ID).expect("Test user id should be valid."),
			StagingArea::new(staging_dir),
			vec!["instagram_business_basic".to_owned()],
		)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
use color_eyre as _;

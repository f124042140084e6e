//! Transport primitives for Graph API calls.
//!
//! [`ReqwestHttpClient`] is the relay's only dependency on an HTTP stack. Every flow builds its
//! request on the shared client and hands it to [`send_json`], which applies the same policy to
//! every remote step: non-2xx answers become [`UpstreamError::Status`] (with a truncated body
//! preview and any Retry-After hint), undecodable bodies become [`UpstreamError::Decode`], and
//! network failures or elapsed timeouts become [`UpstreamError::Transport`].

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{
	ClientBuilder, RequestBuilder,
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, UpstreamError},
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Graph endpoints answer directly, so redirects are never followed. Every constructor bounds
/// each call with a timeout. Clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Per-call timeout applied when none is configured.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Reqwest builder preloaded with the relay policy: `timeout` per call, no redirects.
	pub fn builder(timeout: StdDuration) -> ClientBuilder {
		ReqwestClient::builder().timeout(timeout).redirect(Policy::none())
	}

	/// Builds a client that abandons any single remote call after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = Self::builder(timeout).build()?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Sends `request` and decodes a successful JSON body into `T`.
pub async fn send_json<T>(request: RequestBuilder) -> Result<T, UpstreamError>
where
	T: DeserializeOwned,
{
	let response = request.send().await?;
	let status = response.status();
	let retry_after = parse_retry_after(response.headers());
	let body = response.bytes().await?;

	if !status.is_success() {
		return Err(UpstreamError::Status {
			status: status.as_u16(),
			retry_after,
			body: body_preview(&body),
		});
	}

	let mut de = serde_json::Deserializer::from_slice(&body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| UpstreamError::Decode { status: status.as_u16(), source })
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

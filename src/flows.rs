//! Remote protocols orchestrated by the [`GraphBroker`] facade.
//!
//! Each protocol lives in its own module and adds methods to [`GraphBroker`]: the authorize
//! URL, the code exchange + identity resolution, the profile lookup, the long-lived token
//! refresh, and the two-phase container publish. All of them share the same transport and
//! descriptor, attempt every remote call exactly once, and collapse upstream failures into a
//! single caller-facing [`Error`] variant.

pub mod authorize;
pub mod common;
pub mod login;
pub mod profile;
pub mod publish;
pub mod refresh;

pub use authorize::*;
pub use common::*;
pub use login::*;
pub use publish::*;

// crates.io
use oauth2::{ClientId, ClientSecret, RedirectUrl};
// self
use crate::{
	_prelude::*, config::Config, error::ConfigError, http::ReqwestHttpClient,
	provider::GraphDescriptor,
};

/// Coordinates every remote protocol against a single graph descriptor.
///
/// The broker owns the HTTP client, the descriptor, and the OAuth client registration so the
/// individual protocols can focus on request shapes. Clones share the reqwest connection pool.
#[derive(Clone)]
pub struct GraphBroker {
	/// HTTP client wrapper used for every outbound platform request.
	pub http_client: ReqwestHttpClient,
	/// Descriptor that defines the platform endpoints.
	pub descriptor: GraphDescriptor,
	/// OAuth client identifier used by the authorize URL and code exchange.
	pub client_id: ClientId,
	/// OAuth client secret used by the code exchange.
	pub client_secret: ClientSecret,
	/// Redirect URI registered with the platform.
	pub redirect_uri: RedirectUrl,
}
impl GraphBroker {
	/// Creates a broker with its own transport bounded by
	/// [`ReqwestHttpClient::DEFAULT_TIMEOUT`].
	pub fn new(
		descriptor: GraphDescriptor,
		client_id: ClientId,
		client_secret: ClientSecret,
		redirect_uri: RedirectUrl,
	) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::with_timeout(ReqwestHttpClient::DEFAULT_TIMEOUT)?;

		Ok(Self::with_http_client(descriptor, client_id, client_secret, redirect_uri, http_client))
	}

	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: GraphDescriptor,
		client_id: ClientId,
		client_secret: ClientSecret,
		redirect_uri: RedirectUrl,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self { http_client, descriptor, client_id, client_secret, redirect_uri }
	}

	/// Builds the production broker: Instagram + Threads endpoints and a timeout-bounded client.
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let descriptor = GraphDescriptor::instagram()?;
		let http_client = ReqwestHttpClient::with_timeout(config.http_timeout)?;

		Ok(Self::with_http_client(
			descriptor,
			config.client_id.clone(),
			config.client_secret.clone(),
			config.redirect_uri.clone(),
			http_client,
		))
	}
}
impl Debug for GraphBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphBroker")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id.as_str())
			.field("redirect_uri", &self.redirect_uri.as_str())
			.finish_non_exhaustive()
	}
}

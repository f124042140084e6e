//! Long-lived token refresh.
//!
//! The relay stores no tokens: the caller presents the token it holds and receives the renewed
//! one. Instagram only renews long-lived tokens that are at least a day old; a rejection is
//! reported as [`Error::RefreshFailed`] like any other upstream failure.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::{GraphBroker, common},
	http,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::GrantType,
};

#[derive(Deserialize)]
struct RefreshResponse {
	access_token: AccessToken,
	#[serde(default)]
	expires_in: Option<i64>,
}

impl GraphBroker {
	/// Exchanges `current` for a renewed long-lived token.
	pub async fn refresh_access_token(&self, current: &AccessToken) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let query = [
					("grant_type", GrantType::IgRefreshToken.as_str()),
					("access_token", current.expose()),
				];
				let request = self
					.http_client
					.get(self.descriptor.graph_url(&["refresh_access_token"]))
					.query(&query);
				let response = http::send_json::<RefreshResponse>(request).await.map_err(|e| {
					common::collapse(KIND, "refresh_access_token", e, Error::RefreshFailed)
				})?;

				tracing::debug!(expires_in = response.expires_in, "Refreshed long-lived token.");

				Ok(response.access_token)
			})
			.await;

		common::record_outcome(KIND, &result);

		result
	}
}

//! Extended profile lookup for the token owner.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::CredentialContext,
	flows::{GraphBroker, common},
	http,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Field set requested from `GET {graph}/me`.
pub const PROFILE_FIELDS: &str = "id,username,account_type,media_count";

impl GraphBroker {
	/// Fetches the profile of the token owner and returns the raw JSON object unchanged.
	pub async fn fetch_profile(&self, ctx: &CredentialContext) -> Result<Map<String, Value>> {
		const KIND: FlowKind = FlowKind::Profile;

		let span = FlowSpan::new(KIND, "fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let query =
					[("fields", PROFILE_FIELDS), ("access_token", ctx.access_token.expose())];
				let request =
					self.http_client.get(self.descriptor.graph_url(&["me"])).query(&query);

				http::send_json(request).await.map_err(|e| {
					common::collapse(KIND, "fetch_profile", e, Error::ProfileFetchFailed)
				})
			})
			.await;

		common::record_outcome(KIND, &result);

		result
	}
}

//! Authorize URL construction for the Instagram Login redirect.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	flows::GraphBroker,
	obs::{self, FlowKind, FlowOutcome},
};

const STATE_LEN: usize = 32;

/// Authorize URL plus the opaque `state` embedded in it.
///
/// The relay keeps no session store; the caller is responsible for comparing `state` with the
/// value returned on the redirect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthorizationRequest {
	/// Fully formed authorize URL the end user should be sent to.
	pub url: Url,
	/// Random alphanumeric value that must round-trip through the redirect.
	pub state: String,
}

impl GraphBroker {
	/// Builds the authorize URL requesting `scopes` (comma-joined on the wire).
	pub fn authorize_url<I, S>(&self, scopes: I) -> AuthorizationRequest
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Attempt);

		let state = random_string(STATE_LEN);
		let scope = scopes
			.into_iter()
			.map(|scope| scope.as_ref().trim().to_owned())
			.filter(|scope| !scope.is_empty())
			.collect::<Vec<_>>()
			.join(",");
		let mut url = self.descriptor.endpoints.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("client_id", self.client_id.as_str());
		pairs.append_pair("redirect_uri", self.redirect_uri.as_str());

		if !scope.is_empty() {
			pairs.append_pair("scope", &scope);
		}

		pairs.append_pair("response_type", "code");
		pairs.append_pair("state", &state);

		drop(pairs);

		tracing::debug!(flow = FlowKind::Authorize.as_str(), "Built authorize URL.");
		obs::record_flow_outcome(FlowKind::Authorize, FlowOutcome::Success);

		AuthorizationRequest { url, state }
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

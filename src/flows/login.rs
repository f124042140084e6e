//! Authorization code exchange followed by identity resolution.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, UserId},
	flows::{GraphBroker, common},
	http,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::GrantType,
};

const KIND: FlowKind = FlowKind::Login;
const IDENTITY_FIELDS: &str = "id,username";

/// Result of a successful login: the new token plus the identity it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
	/// Bearer token issued by the token endpoint.
	pub access_token: AccessToken,
	/// Identity resolved with that token.
	pub user: LoginUser,
}

/// Minimal identity returned by the Graph API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
	/// Platform user id.
	pub id: UserId,
	/// Platform username.
	pub username: String,
}

#[derive(Deserialize)]
struct TokenExchangeResponse {
	access_token: AccessToken,
	user_id: UserId,
}

impl GraphBroker {
	/// Exchanges a one-time authorization code and resolves the user it was issued for.
	///
	/// The code is forwarded exactly as received. An empty code fails locally with
	/// [`Error::BadRequest`]. Any remote failure, in either step, collapses into
	/// [`Error::AuthExchangeFailed`].
	pub async fn exchange_code(&self, code: &str) -> Result<LoginOutcome> {
		if code.is_empty() {
			return Err(Error::bad_request("Authorization code missing"));
		}

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.request_token(code).await?;
				let user = self.resolve_identity(&token).await?;

				Ok(LoginOutcome { access_token: token.access_token, user })
			})
			.await;

		common::record_outcome(KIND, &result);

		result
	}

	async fn request_token(&self, code: &str) -> Result<TokenExchangeResponse> {
		let request = self.http_client.post(self.descriptor.endpoints.token.clone()).form(&[
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.secret().as_str()),
			("grant_type", GrantType::AuthorizationCode.as_str()),
			("redirect_uri", self.redirect_uri.as_str()),
			("code", code),
		]);

		http::send_json(request)
			.await
			.map_err(|e| common::collapse(KIND, "request_token", e, Error::AuthExchangeFailed))
	}

	async fn resolve_identity(&self, token: &TokenExchangeResponse) -> Result<LoginUser> {
		let request = self
			.http_client
			.get(self.descriptor.graph_url(&[&*token.user_id]))
			.query(&[("fields", IDENTITY_FIELDS), ("access_token", token.access_token.expose())]);

		http::send_json(request)
			.await
			.map_err(|e| common::collapse(KIND, "resolve_identity", e, Error::AuthExchangeFailed))
	}
}

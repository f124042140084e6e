//! Per-request credential context derived from inbound headers.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, UserId},
};

/// Header carrying the caller's bearer token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
/// Optional header overriding the configured platform user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Bearer token plus platform user id for the duration of one inbound request.
///
/// The token is passed through opaquely; the platform is the only authority on its validity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialContext {
	/// Caller-supplied bearer token.
	pub access_token: AccessToken,
	/// Platform user the request acts on behalf of.
	pub user_id: UserId,
}
impl CredentialContext {
	/// Creates a context from already validated parts.
	pub fn new(access_token: AccessToken, user_id: UserId) -> Self {
		Self { access_token, user_id }
	}

	/// Derives a context from raw header values.
	///
	/// A missing or blank token fails with [`Error::Unauthenticated`]. A present `user_id`
	/// header replaces `default_user`; a malformed one fails with [`Error::BadRequest`].
	pub fn from_header_values(
		token: Option<&str>,
		user_id: Option<&str>,
		default_user: &UserId,
	) -> Result<Self> {
		let token = bearer_token(token)?;
		let user_id = match user_id.map(str::trim).filter(|value| !value.is_empty()) {
			Some(raw) => UserId::new(raw).map_err(|e| Error::bad_request(e.to_string()))?,
			None => default_user.clone(),
		};

		Ok(Self::new(token, user_id))
	}
}

/// Extracts a bearer token from a raw header value, rejecting absent or blank values.
pub fn bearer_token(raw: Option<&str>) -> Result<AccessToken> {
	raw.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(AccessToken::new)
		.ok_or(Error::Unauthenticated)
}

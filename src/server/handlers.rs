//! Route handlers, one per [`GraphBroker`](crate::flows::GraphBroker) protocol.

// crates.io
use axum::{
	Json,
	extract::{Multipart, State, multipart::MultipartRejection, rejection::JsonRejection},
};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, RawId},
	flows::{AuthorizationRequest, LoginOutcome, PublishOutcome},
	server::{AppState, BearerToken, Credentials, read_post_form},
};

/// `POST /instagram` body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginRequest {
	/// One-time authorization code from the redirect; numeric codes are forwarded as text.
	#[serde(default)]
	pub code: Option<RawId>,
}

/// `GET /refresh-token` response.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshResponse {
	/// Renewed long-lived token.
	pub access_token: AccessToken,
}

/// `GET /profile`.
pub async fn profile(
	State(state): State<AppState>,
	Credentials(ctx): Credentials,
) -> Result<Json<Map<String, Value>>> {
	state.broker.fetch_profile(&ctx).await.map(Json)
}

/// `POST /instagram`.
pub async fn login(
	State(state): State<AppState>,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginOutcome>> {
	let code = match payload {
		Ok(Json(request)) => request.code.map(RawId::into_string).unwrap_or_default(),
		Err(rejection) => {
			tracing::debug!(error = %rejection.body_text(), "Rejected login body.");

			String::new()
		},
	};

	state.broker.exchange_code(&code).await.map(Json)
}

/// `POST /post`.
pub async fn post(
	State(state): State<AppState>,
	Credentials(ctx): Credentials,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PublishOutcome>> {
	let multipart = multipart
		.map_err(|e| Error::bad_request(format!("Expected a multipart body: {}", e.body_text())))?;
	let form = read_post_form(multipart, &state.policy, &state.staging).await?;

	state.broker.publish(&ctx, form.upload, form.caption.as_deref()).await.map(Json)
}

/// `GET /refresh-token`.
pub async fn refresh_token(
	State(state): State<AppState>,
	BearerToken(token): BearerToken,
) -> Result<Json<RefreshResponse>> {
	let access_token = state.broker.refresh_access_token(&token).await?;

	Ok(Json(RefreshResponse { access_token }))
}

/// `GET /instagram/authorize-url`.
pub async fn authorize_url(State(state): State<AppState>) -> Json<AuthorizationRequest> {
	Json(state.broker.authorize_url(state.scopes.iter()))
}

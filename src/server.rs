//! axum surface for the relay.
//!
//! | Method + path | Handler |
//! |---|---|
//! | `GET /profile` | [`GraphBroker::fetch_profile`] |
//! | `POST /instagram` | [`GraphBroker::exchange_code`] |
//! | `POST /post` | [`GraphBroker::publish`] |
//! | `GET /refresh-token` | [`GraphBroker::refresh_access_token`] |
//! | `GET /instagram/authorize-url` | [`GraphBroker::authorize_url`] |
//!
//! Every failure is rendered as `{"message": "..."}` with the status from
//! [`Error::status_code`].

pub mod extract;
pub mod handlers;

pub use extract::*;

// crates.io
use axum::{
	Json, Router,
	extract::DefaultBodyLimit,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	auth::UserId,
	config::Config,
	error::ConfigError,
	flows::GraphBroker,
	upload::{MAX_UPLOAD_BYTES, StagingArea, UploadPolicy},
};

/// Request body ceiling; kept above the upload limit so oversize parts reach admission.
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Read-only state shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Broker running the remote protocols.
	pub broker: GraphBroker,
	/// User id applied when a request carries no `x-user-id` override.
	pub default_user: UserId,
	/// Where admitted uploads are staged.
	pub staging: StagingArea,
	/// Upload admission rules.
	pub policy: UploadPolicy,
	/// Scopes requested by the authorize URL.
	pub scopes: Arc<[String]>,
}
impl AppState {
	/// Assembles state from already built parts, using the default upload policy.
	pub fn new(
		broker: GraphBroker,
		default_user: UserId,
		staging: StagingArea,
		scopes: impl Into<Arc<[String]>>,
	) -> Self {
		let policy = UploadPolicy::default();

		Self { broker, default_user, staging, policy, scopes: scopes.into() }
	}

	/// Builds the production state and prepares the staging directory.
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let broker = GraphBroker::from_config(config)?;
		let staging = StagingArea::new(config.upload_dir.clone());

		staging.ensure()?;

		Ok(Self::new(broker, config.default_user.clone(), staging, config.scopes.clone()))
	}
}

/// Builds the relay router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/profile", get(handlers::profile))
		.route("/instagram", post(handlers::login))
		.route("/instagram/authorize-url", get(handlers::authorize_url))
		.route("/post", post(handlers::post))
		.route("/refresh-token", get(handlers::refresh_token))
		.layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Serves the router on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
	let addr = listener.local_addr()?;

	tracing::info!(%addr, upload_dir = %state.staging.dir().display(), "Relay listening.");

	axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Relay stopped.");

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "Failed to listen for Ctrl-C.");

			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};

		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::error!(error = %e, "Failed to listen for SIGTERM.");

				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("Received Ctrl-C."),
		_ = terminate => tracing::info!("Received SIGTERM."),
	}
}

/// JSON error body returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Short human-readable message.
	pub message: String,
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status =
			StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		if let Error::Config(e) = &self {
			tracing::error!(error = %e, "Request failed on a configuration problem.");
		}

		(status, Json(ErrorBody { message: self.public_message() })).into_response()
	}
}

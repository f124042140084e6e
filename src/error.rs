//! Relay-level error types shared across flows, staging, and the HTTP surface.
//!
//! Remote steps fail with an [`UpstreamError`]; every protocol maps those failures into exactly
//! one caller-facing [`Error`] variant after logging the upstream detail, so nothing returned to
//! a client ever carries provider internals.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Request did not carry an access token.
	#[error("No token provided")]
	Unauthenticated,
	/// Request is missing a required field or carries a malformed one.
	#[error("{reason}")]
	BadRequest {
		/// Human-readable reason returned to the caller.
		reason: String,
	},
	/// Upload violated the type or size admission policy.
	#[error("{reason}")]
	InvalidUpload {
		/// Human-readable reason returned to the caller.
		reason: String,
	},
	/// Authorization code exchange or identity resolution failed upstream.
	#[error("Instagram login failed")]
	AuthExchangeFailed,
	/// Profile lookup failed upstream.
	#[error("Could not retrieve Instagram profile")]
	ProfileFetchFailed,
	/// Long-lived token refresh failed upstream.
	#[error("Failed to refresh token")]
	RefreshFailed,
	/// Container creation or publish confirmation failed upstream.
	#[error("Failed to post to Threads")]
	PublishFailed,
}
impl Error {
	/// Builds a [`Error::BadRequest`] from any displayable reason.
	pub fn bad_request(reason: impl Into<String>) -> Self {
		Self::BadRequest { reason: reason.into() }
	}

	/// Builds a [`Error::InvalidUpload`] from any displayable reason.
	pub fn invalid_upload(reason: impl Into<String>) -> Self {
		Self::InvalidUpload { reason: reason.into() }
	}

	/// HTTP status code surfaced to callers for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Unauthenticated => 401,
			Self::BadRequest { .. } | Self::InvalidUpload { .. } => 400,
			Self::Config(_)
			| Self::AuthExchangeFailed
			| Self::ProfileFetchFailed
			| Self::RefreshFailed
			| Self::PublishFailed => 500,
		}
	}

	/// Message safe to return to callers.
	///
	/// Configuration failures are collapsed into a generic message so local details (variable
	/// names, paths) stay in the server log.
	pub fn public_message(&self) -> String {
		match self {
			Self::Config(_) => "Internal server error".into(),
			other => other.to_string(),
		}
	}
}

/// Configuration and validation failures raised by the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Required environment variable is absent.
	#[error("Environment variable `{name}` is required.")]
	MissingVar {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable is present but cannot be parsed.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidVar {
		/// Variable name.
		name: &'static str,
		/// Parser-supplied reason.
		reason: String,
	},
	/// Descriptor or redirect contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::GraphDescriptorError),
	/// Identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Staging directory could not be prepared.
	#[error("Staging directory {path} is unusable.")]
	StagingDir {
		/// Directory that failed.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure of a single remote step.
///
/// Protocols never forward these to callers; they log them and collapse into their own
/// [`Error`] variant.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Network, TLS, or timeout failure while calling the endpoint.
	#[error("Network error occurred while calling the upstream endpoint.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: ReqwestError,
	},
	/// Endpoint answered with a non-success status.
	#[error("Upstream endpoint returned HTTP {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
		/// Truncated response body.
		body: String,
	},
	/// Endpoint answered with a body that does not match the expected shape.
	#[error("Upstream endpoint returned malformed JSON.")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Staged upload could not be read back.
	#[error("Staged upload could not be read.")]
	Staging(#[from] std::io::Error),
}
impl UpstreamError {
	/// HTTP status code, when the endpoint answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport { source } => source.status().map(|code| code.as_u16()),
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::Staging(_) => None,
		}
	}

	/// Returns `true` when the transport gave up because the per-call timeout elapsed.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Transport { source } if source.is_timeout())
	}
}
impl From<ReqwestError> for UpstreamError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport { source: e }
	}
}

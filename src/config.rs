//! Process configuration loaded from the environment (and an optional `.env` file).
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `INSTAGRAM_CLIENT_ID` | yes | |
//! | `INSTAGRAM_CLIENT_SECRET` | yes | |
//! | `REDIRECT_URI` | yes | |
//! | `USER_ID` | yes | |
//! | `BIND_ADDR` | no | `0.0.0.0:5000` |
//! | `UPLOAD_DIR` | no | `<tmp>/threads-relay-uploads` |
//! | `HTTP_TIMEOUT_SECS` | no | `30` |
//! | `INSTAGRAM_SCOPES` | no | `instagram_business_basic,instagram_business_content_publish` |

// std
use std::{env, net::SocketAddr, path::PathBuf, time::Duration as StdDuration};
// crates.io
use oauth2::{ClientId, ClientSecret, RedirectUrl};
// self
use crate::{_prelude::*, auth::UserId, error::ConfigError, http::ReqwestHttpClient};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_SCOPES: &str = "instagram_business_basic,instagram_business_content_publish";
const UPLOAD_DIR_NAME: &str = "threads-relay-uploads";

/// Read-only process configuration shared by every request.
#[derive(Clone, Debug)]
pub struct Config {
	/// OAuth client identifier registered with the platform.
	pub client_id: ClientId,
	/// OAuth client secret (redacted in `Debug`).
	pub client_secret: ClientSecret,
	/// Redirect URI registered with the platform.
	pub redirect_uri: RedirectUrl,
	/// User id applied to requests that do not name one explicitly.
	pub default_user: UserId,
	/// Socket address the HTTP server binds to.
	pub bind_addr: SocketAddr,
	/// Directory holding staged uploads.
	pub upload_dir: PathBuf,
	/// Per-call timeout for outbound requests.
	pub http_timeout: StdDuration,
	/// Scopes requested by the authorize URL.
	pub scopes: Vec<String>,
}
impl Config {
	/// Loads `.env` (when present) and then reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name)
				.map(|value| value.trim().to_owned())
				.filter(|value| !value.is_empty())
				.ok_or(ConfigError::MissingVar { name })
		};
		let optional = |name: &'static str| {
			lookup(name).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
		};
		let client_id = ClientId::new(required("INSTAGRAM_CLIENT_ID")?);
		let client_secret = ClientSecret::new(required("INSTAGRAM_CLIENT_SECRET")?);
		let redirect_uri = RedirectUrl::new(required("REDIRECT_URI")?)
			.map_err(|source| ConfigError::InvalidUrl { source })?;
		let default_user = UserId::new(required("USER_ID")?)?;
		let bind_addr = optional("BIND_ADDR")
			.unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
			.parse::<SocketAddr>()
			.map_err(|e| ConfigError::InvalidVar { name: "BIND_ADDR", reason: e.to_string() })?;
		let upload_dir = optional("UPLOAD_DIR")
			.map(PathBuf::from)
			.unwrap_or_else(|| env::temp_dir().join(UPLOAD_DIR_NAME));
		let http_timeout = match optional("HTTP_TIMEOUT_SECS") {
			Some(raw) => parse_timeout(&raw)?,
			None => ReqwestHttpClient::DEFAULT_TIMEOUT,
		};
		let scopes =
			split_scopes(&optional("INSTAGRAM_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.into()));

		Ok(Self {
			client_id,
			client_secret,
			redirect_uri,
			default_user,
			bind_addr,
			upload_dir,
			http_timeout,
			scopes,
		})
	}
}

fn parse_timeout(raw: &str) -> Result<StdDuration, ConfigError> {
	let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidVar {
		name: "HTTP_TIMEOUT_SECS",
		reason: e.to_string(),
	})?;

	if secs == 0 {
		return Err(ConfigError::InvalidVar {
			name: "HTTP_TIMEOUT_SECS",
			reason: "must be positive".into(),
		});
	}

	Ok(StdDuration::from_secs(secs))
}

fn split_scopes(raw: &str) -> Vec<String> {
	raw.split([',', ' '])
		.map(str::trim)
		.filter(|scope| !scope.is_empty())
		.map(str::to_owned)
		.collect()
}

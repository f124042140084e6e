//! Graph descriptor data structures and URL helpers shared by all flows.

/// Builder API for assembling graph descriptors.
pub mod builder;
/// Grant identifiers sent to the platform.
pub mod grant;

pub use builder::*;
pub use grant::*;

// self
use crate::_prelude::*;

/// Default Instagram Login authorize page.
pub const INSTAGRAM_AUTHORIZE_URL: &str = "https://www.instagram.com/oauth/authorize";
/// Default Instagram Login token endpoint.
pub const INSTAGRAM_TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
/// Default Instagram Graph API base.
pub const INSTAGRAM_GRAPH_URL: &str = "https://graph.instagram.com";
/// Default Threads Graph API base (versioned).
pub const THREADS_GRAPH_URL: &str = "https://graph.threads.net/v1.0";

/// Endpoint set declared by a graph descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEndpoints {
	/// Authorize page the end user is redirected to.
	pub authorization: Url,
	/// Token endpoint that exchanges authorization codes.
	pub token: Url,
	/// Instagram Graph API base used for profile lookups and token refresh.
	pub graph: Url,
	/// Threads Graph API base used for container creation and publishing.
	pub threads: Url,
}

/// Immutable, validated descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescriptor {
	/// Endpoint definitions exposed by the platform.
	pub endpoints: GraphEndpoints,
}
impl GraphDescriptor {
	/// Creates a new builder with no endpoints set.
	pub fn builder() -> GraphDescriptorBuilder {
		GraphDescriptorBuilder::new()
	}

	/// Builds the descriptor for the production Instagram + Threads endpoints.
	pub fn instagram() -> Result<Self, GraphDescriptorError> {
		GraphDescriptor::builder()
			.authorization_endpoint(parse_default("authorization", INSTAGRAM_AUTHORIZE_URL)?)
			.token_endpoint(parse_default("token", INSTAGRAM_TOKEN_URL)?)
			.graph_base(parse_default("graph", INSTAGRAM_GRAPH_URL)?)
			.threads_base(parse_default("threads", THREADS_GRAPH_URL)?)
			.build()
	}

	/// Instagram Graph URL for the provided path segments (e.g. `["me"]`).
	pub fn graph_url(&self, segments: &[&str]) -> Url {
		extend(&self.endpoints.graph, segments)
	}

	/// Threads Graph URL for the provided path segments (e.g. `[user_id, "threads"]`).
	pub fn threads_url(&self, segments: &[&str]) -> Url {
		extend(&self.endpoints.threads, segments)
	}
}

fn parse_default(endpoint: &'static str, raw: &str) -> Result<Url, GraphDescriptorError> {
	Url::parse(raw)
		.map_err(|e| GraphDescriptorError::InvalidUrl { endpoint, reason: e.to_string() })
}

// Validated bases are http(s), which always accept path segments.
fn extend(base: &Url, segments: &[&str]) -> Url {
	let mut url = base.clone();

	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}

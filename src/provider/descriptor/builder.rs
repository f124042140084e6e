// std
use std::net::IpAddr;
// self
use crate::{
	_prelude::*,
	provider::{GraphDescriptor, GraphEndpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum GraphDescriptorError {
	/// A required endpoint was never set.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoint string could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL: {reason}.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Parser-supplied reason.
		reason: String,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`GraphDescriptor`] values.
#[derive(Debug, Default)]
pub struct GraphDescriptorBuilder {
	/// Authorize page the end user is redirected to.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for code exchanges.
	pub token_endpoint: Option<Url>,
	/// Instagram Graph API base.
	pub graph_base: Option<Url>,
	/// Threads Graph API base.
	pub threads_base: Option<Url>,
}
impl GraphDescriptorBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the authorize page.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the Instagram Graph API base.
	pub fn graph_base(mut self, url: Url) -> Self {
		self.graph_base = Some(url);

		self
	}

	/// Sets the Threads Graph API base.
	pub fn threads_base(mut self, url: Url) -> Self {
		self.threads_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<GraphDescriptor, GraphDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(GraphDescriptorError::MissingEndpoint { endpoint: "authorization" })?;
		let token =
			self.token_endpoint.ok_or(GraphDescriptorError::MissingEndpoint { endpoint: "token" })?;
		let graph =
			self.graph_base.ok_or(GraphDescriptorError::MissingEndpoint { endpoint: "graph" })?;
		let threads =
			self.threads_base.ok_or(GraphDescriptorError::MissingEndpoint { endpoint: "threads" })?;
		let descriptor =
			GraphDescriptor { endpoints: GraphEndpoints { authorization, token, graph, threads } };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl GraphDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), GraphDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("graph", &self.endpoints.graph)?;
		validate_endpoint("threads", &self.endpoints.threads)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), GraphDescriptorError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(GraphDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(url::Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

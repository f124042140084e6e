//! Shared helpers for flow implementations (failure collapsing, outcome recording).

// self
use crate::{
	_prelude::*,
	error::UpstreamError,
	obs::{self, FlowKind, FlowOutcome},
};

/// Logs the full upstream failure for `stage` and returns the protocol's `collapsed` error.
///
/// Transport errors have their URL stripped first: query strings carry bearer tokens.
pub fn collapse(
	kind: FlowKind,
	stage: &'static str,
	err: UpstreamError,
	collapsed: Error,
) -> Error {
	match err {
		UpstreamError::Transport { source } => {
			let timeout = source.is_timeout();

			tracing::error!(
				flow = kind.as_str(),
				stage,
				timeout,
				error = %source.without_url(),
				"Upstream call failed before a response arrived."
			);
		},
		UpstreamError::Status { status, retry_after, body } => {
			tracing::error!(
				flow = kind.as_str(),
				stage,
				status,
				retry_after_secs = retry_after.map(|delay| delay.whole_seconds()),
				body = %body,
				"Upstream call returned an error status."
			);
		},
		UpstreamError::Decode { status, source } => {
			tracing::error!(
				flow = kind.as_str(),
				stage,
				status,
				path = %source.path(),
				error = %source.inner(),
				"Upstream call returned an unexpected body."
			);
		},
		UpstreamError::Staging(source) => {
			tracing::error!(
				flow = kind.as_str(),
				stage,
				error = %source,
				"Staged upload could not be read."
			);
		},
	}

	collapsed
}

/// Records the success/failure counter for a finished flow.
pub fn record_outcome<T>(kind: FlowKind, result: &Result<T>) {
	match result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn collapse_returns_the_protocol_error() {
		let err = UpstreamError::Status {
			status: 400,
			retry_after: Some(Duration::seconds(3)),
			body: "{\"error\":{\"message\":\"Invalid OAuth access token.\"}}".into(),
		};
		let collapsed = collapse(FlowKind::Profile, "fetch_profile", err, Error::ProfileFetchFailed);

		assert!(matches!(collapsed, Error::ProfileFetchFailed));
		assert!(!collapsed.public_message().contains("OAuth"));
	}

	#[test]
	fn collapse_handles_staging_failures() {
		let err = UpstreamError::from(std::io::Error::other("gone"));

		assert!(matches!(
			collapse(FlowKind::Publish, "read_staged", err, Error::PublishFailed),
			Error::PublishFailed
		));
	}
}

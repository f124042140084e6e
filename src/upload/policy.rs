//! Admission rules for uploaded image parts: MIME allow-list and streaming size cap.

// self
use crate::_prelude::*;

/// Multipart field carrying the image payload.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the caption text.
pub const CAPTION_FIELD: &str = "caption";
/// Largest admitted upload, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// MIME types admitted for image uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Admission rules for uploaded parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
	/// Lower-case MIME types accepted without parameters.
	pub allowed_types: Vec<String>,
	/// Maximum accepted byte length.
	pub max_bytes: usize,
}
impl UploadPolicy {
	/// Checks the declared content type and returns its normalized form.
	///
	/// Parameters (`; charset=...`) are ignored and the comparison is case-insensitive. A part
	/// without a declared type is rejected.
	pub fn admit_content_type(&self, declared: Option<&str>) -> Result<String> {
		let normalized = declared
			.and_then(|value| value.split(';').next())
			.map(|value| value.trim().to_ascii_lowercase())
			.unwrap_or_default();

		if self.allowed_types.iter().any(|allowed| *allowed == normalized) {
			Ok(normalized)
		} else {
			Err(Error::invalid_upload(format!(
				"Invalid file type. Only {} are allowed.",
				describe_types(&self.allowed_types)
			)))
		}
	}

	/// Appends `chunk` to `buf`, failing as soon as the total would exceed the limit.
	pub fn accept_chunk(&self, buf: &mut Vec<u8>, chunk: &[u8]) -> Result<()> {
		if buf.len().saturating_add(chunk.len()) > self.max_bytes {
			return Err(Error::invalid_upload(format!(
				"File too large. Maximum size is {} bytes.",
				self.max_bytes
			)));
		}

		buf.extend_from_slice(chunk);

		Ok(())
	}
}
impl Default for UploadPolicy {
	fn default() -> Self {
		Self {
			allowed_types: ALLOWED_IMAGE_TYPES.iter().map(|value| (*value).to_owned()).collect(),
			max_bytes: MAX_UPLOAD_BYTES,
		}
	}
}

// `["image/jpeg", "image/png"]` -> `"JPEG and PNG"`.
fn describe_types(types: &[String]) -> String {
	let labels = types
		.iter()
		.map(|ty| ty.rsplit('/').next().unwrap_or(ty).to_ascii_uppercase())
		.collect::<Vec<_>>();

	match labels.as_slice() {
		[] => "no types".into(),
		[only] => only.clone(),
		[first, second] => format!("{first} and {second}"),
		[head @ .., last] => format!("{}, and {last}", head.join(", ")),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn allowed_types_are_normalized() {
		let policy = UploadPolicy::default();

		assert_eq!(
			policy.admit_content_type(Some("IMAGE/PNG; charset=binary")).expect("PNG is allowed."),
			"image/png"
		);
		assert_eq!(policy.admit_content_type(Some("image/gif")).expect("GIF is allowed."), "image/gif");
	}

	#[test]
	fn disallowed_or_missing_types_are_rejected() {
		let policy = UploadPolicy::default();

		for declared in [Some("image/webp"), Some("application/pdf"), Some(""), None] {
			let err = policy
				.admit_content_type(declared)
				.expect_err("Only the allow-listed types may be admitted.");

			assert_eq!(
				err.public_message(),
				"Invalid file type. Only JPEG, PNG, and GIF are allowed."
			);
		}
	}

	#[test]
	fn size_limit_is_inclusive() {
		let policy = UploadPolicy { max_bytes: 8, ..UploadPolicy::default() };
		let mut buf = Vec::new();

		policy.accept_chunk(&mut buf, &[0; 5]).expect("First chunk fits.");
		policy.accept_chunk(&mut buf, &[0; 3]).expect("Exactly the limit fits.");

		let err = policy.accept_chunk(&mut buf, &[0; 1]).expect_err("One byte over must fail.");

		assert!(matches!(err, Error::InvalidUpload { .. }));
		assert_eq!(buf.len(), 8, "Rejected chunks must not be buffered.");
	}
}

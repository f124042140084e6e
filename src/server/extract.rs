//! Request extractors: credential headers and the `/post` multipart body.

// crates.io
use axum::{
	extract::{FromRequestParts, Multipart},
	http::{HeaderMap, request::Parts},
};
// self
use crate::{
	_prelude::*,
	auth::{ACCESS_TOKEN_HEADER, AccessToken, CredentialContext, USER_ID_HEADER, bearer_token},
	server::AppState,
	upload::{CAPTION_FIELD, IMAGE_FIELD, StagedUpload, StagingArea, UploadPolicy},
};

/// Extracts the per-request [`CredentialContext`] from `x-access-token` (+ `x-user-id`).
///
/// Runs before any body extractor, so a request without a token is rejected before anything
/// is read or staged.
#[derive(Clone, Debug)]
pub struct Credentials(pub CredentialContext);
impl FromRequestParts<AppState> for Credentials {
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
		CredentialContext::from_header_values(
			header_str(&parts.headers, ACCESS_TOKEN_HEADER),
			header_str(&parts.headers, USER_ID_HEADER),
			&state.default_user,
		)
		.map(Self)
	}
}

/// Extracts only the caller's bearer token from `x-access-token`.
#[derive(Clone, Debug)]
pub struct BearerToken(pub AccessToken);
impl<S> FromRequestParts<S> for BearerToken
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
		bearer_token(header_str(&parts.headers, ACCESS_TOKEN_HEADER)).map(Self)
	}
}

// Non-UTF-8 values are treated as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|value| value.to_str().ok())
}

/// Parsed `/post` body.
#[derive(Debug, Default)]
pub struct PostForm {
	/// Admitted and staged image, when one was sent.
	pub upload: Option<StagedUpload>,
	/// Caption text, when one was sent.
	pub caption: Option<String>,
}

/// Reads the `/post` multipart body, admitting at most one `image` part.
///
/// The declared MIME type is checked before any byte is read and the size is enforced while
/// streaming, so rejected parts never reach disk. Unknown fields are skipped.
pub async fn read_post_form(
	mut multipart: Multipart,
	policy: &UploadPolicy,
	staging: &StagingArea,
) -> Result<PostForm> {
	let mut image = None;
	let mut caption = None;

	while let Some(mut field) = multipart
		.next_field()
		.await
		.map_err(|e| Error::bad_request(format!("Malformed multipart body: {}", e.body_text())))?
	{
		let name = field.name().map(str::to_owned);

		match name.as_deref() {
			Some(IMAGE_FIELD) => {
				// Browsers send an empty, nameless part when no file was chosen.
				if field.file_name() == Some("") {
					continue;
				}
				if image.is_some() {
					return Err(Error::invalid_upload("Only one image may be uploaded per post."));
				}

				let content_type = policy.admit_content_type(field.content_type())?;
				let file_name = field.file_name().unwrap_or("upload").to_owned();
				let mut bytes = Vec::new();

				while let Some(chunk) = field.chunk().await.map_err(|e| {
					Error::invalid_upload(format!("Upload could not be read: {}", e.body_text()))
				})? {
					policy.accept_chunk(&mut bytes, &chunk)?;
				}

				image = Some((bytes, file_name, content_type));
			},
			Some(CAPTION_FIELD) => {
				let text = field.text().await.map_err(|e| {
					Error::bad_request(format!("Caption could not be read: {}", e.body_text()))
				})?;

				caption = Some(text);
			},
			_ => continue,
		}
	}

	let upload = match image {
		Some((bytes, file_name, content_type)) =>
			Some(staging.stage(bytes, file_name, content_type).await.map_err(|e| {
				tracing::error!(
					dir = %staging.dir().display(),
					error = %e,
					"Failed to stage upload."
				);

				Error::PublishFailed
			})?),
		None => None,
	};

	Ok(PostForm { upload, caption })
}

//! Two-phase Threads publishing: create a media container, then publish it.
//!
//! ```text
//! START -> CREATE_IMAGE_CONTAINER | CREATE_TEXT_CONTAINER -> PUBLISH -> DONE
//! ```
//!
//! The container branch is chosen by the presence of a staged upload. A failed creation step
//! ends the protocol before the publish call is issued. The staged upload, if any, is removed
//! once the attempt finishes, whichever branch was taken.

// crates.io
use reqwest::multipart::{Form, Part};
// self
use crate::{
	_prelude::*,
	auth::{CreationId, CredentialContext, ThreadId},
	error::UpstreamError,
	flows::{GraphBroker, common},
	http,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	upload::{IMAGE_FIELD, StagedUpload},
};

const KIND: FlowKind = FlowKind::Publish;

/// Message returned after a successful publish.
pub const PUBLISH_SUCCESS_MESSAGE: &str = "Thread posted successfully!";

/// Remote steps of the publish protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishStage {
	/// Image-backed container creation.
	CreateImageContainer,
	/// Text-only container creation.
	CreateTextContainer,
	/// Publish confirmation of a created container.
	Publish,
}
impl PublishStage {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PublishStage::CreateImageContainer => "create_image_container",
			PublishStage::CreateTextContainer => "create_text_container",
			PublishStage::Publish => "publish",
		}
	}

	/// Media type sent with the creation call, when this stage creates a container.
	pub const fn media_type(self) -> Option<&'static str> {
		match self {
			PublishStage::CreateImageContainer => Some("IMAGE"),
			PublishStage::CreateTextContainer => Some("TEXT"),
			PublishStage::Publish => None,
		}
	}
}
impl Display for PublishStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Terminal artifact of a successful publish.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
	/// Human-readable confirmation.
	pub message: String,
	/// Id of the published thread.
	pub thread_id: ThreadId,
}

#[derive(Deserialize)]
struct IdResponse<T> {
	id: T,
}

impl GraphBroker {
	/// Creates a container (image-backed when `upload` is present, text-only otherwise) and
	/// publishes it.
	///
	/// `caption` defaults to the empty string. Failure at either remote step collapses into
	/// [`Error::PublishFailed`]; the staged upload is released before returning in every case.
	pub async fn publish(
		&self,
		ctx: &CredentialContext,
		upload: Option<StagedUpload>,
		caption: Option<&str>,
	) -> Result<PublishOutcome> {
		let caption = caption.unwrap_or_default();
		let span = FlowSpan::new(KIND, "publish");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let creation_id = match &upload {
					Some(staged) => self.create_image_container(ctx, staged, caption).await?,
					None => self.create_text_container(ctx, caption).await?,
				};
				let thread_id = self.publish_container(ctx, creation_id).await?;

				Ok(PublishOutcome { message: PUBLISH_SUCCESS_MESSAGE.into(), thread_id })
			})
			.await;

		if let Some(staged) = upload {
			staged.release();
		}

		common::record_outcome(KIND, &result);

		result
	}

	async fn create_image_container(
		&self,
		ctx: &CredentialContext,
		staged: &StagedUpload,
		caption: &str,
	) -> Result<CreationId> {
		const STAGE: PublishStage = PublishStage::CreateImageContainer;

		let collapse =
			|e: UpstreamError| common::collapse(KIND, STAGE.as_str(), e, Error::PublishFailed);
		let bytes = staged.read().await.map_err(|e| collapse(e.into()))?;
		let part = Part::bytes(bytes)
			.file_name(staged.file_name().to_owned())
			.mime_str(staged.content_type())
			.map_err(|e| collapse(e.into()))?;
		let form = Form::new()
			.part(IMAGE_FIELD, part)
			.text("media_type", STAGE.media_type().unwrap_or_default())
			.text("caption", caption.to_owned())
			.text("access_token", ctx.access_token.expose().to_owned());
		let request = self
			.http_client
			.post(self.descriptor.threads_url(&[&*ctx.user_id, "threads"]))
			.multipart(form);
		let response =
			http::send_json::<IdResponse<CreationId>>(request).await.map_err(collapse)?;

		tracing::debug!(stage = STAGE.as_str(), len = staged.len(), "Created image container.");

		Ok(response.id)
	}

	async fn create_text_container(
		&self,
		ctx: &CredentialContext,
		caption: &str,
	) -> Result<CreationId> {
		const STAGE: PublishStage = PublishStage::CreateTextContainer;

		let query = [
			("media_type", STAGE.media_type().unwrap_or_default()),
			("text", caption),
			("access_token", ctx.access_token.expose()),
		];
		let request = self
			.http_client
			.post(self.descriptor.threads_url(&[&*ctx.user_id, "threads"]))
			.query(&query);
		let response = http::send_json::<IdResponse<CreationId>>(request)
			.await
			.map_err(|e| common::collapse(KIND, STAGE.as_str(), e, Error::PublishFailed))?;

		tracing::debug!(stage = STAGE.as_str(), "Created text container.");

		Ok(response.id)
	}

	// Takes the creation id by value: each container is published at most once.
	async fn publish_container(
		&self,
		ctx: &CredentialContext,
		creation_id: CreationId,
	) -> Result<ThreadId> {
		const STAGE: PublishStage = PublishStage::Publish;

		let query = [("creation_id", &*creation_id), ("access_token", ctx.access_token.expose())];
		let request = self
			.http_client
			.post(self.descriptor.threads_url(&[&*ctx.user_id, "threads_publish"]))
			.query(&query);
		let response = http::send_json::<IdResponse<ThreadId>>(request)
			.await
			.map_err(|e| common::collapse(KIND, STAGE.as_str(), e, Error::PublishFailed))?;

		tracing::info!(stage = STAGE.as_str(), thread_id = %response.id, "Published thread.");

		Ok(response.id)
	}
}

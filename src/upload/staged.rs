//! Temporary on-disk staging for admitted uploads, removed exactly once per upload.

// std
use std::{
	io::{self, Write},
	path::{Path, PathBuf},
};
// crates.io
use tempfile::TempPath;
// self
use crate::{_prelude::*, error::ConfigError};

const STAGED_PREFIX: &str = "upload-";

/// Directory holding admitted uploads until the publish attempt completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagingArea {
	dir: PathBuf,
}
impl StagingArea {
	/// Creates a staging area rooted at `dir`; nothing touches the filesystem yet.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Directory staged files are written to.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Creates the staging directory (and parents) when missing.
	pub fn ensure(&self) -> Result<(), ConfigError> {
		std::fs::create_dir_all(&self.dir).map_err(|source| ConfigError::StagingDir {
			path: self.dir.display().to_string(),
			source,
		})
	}

	/// Writes `bytes` to a uniquely named `upload-*` file and returns its cleanup guard.
	pub async fn stage(
		&self,
		bytes: Vec<u8>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
	) -> io::Result<StagedUpload> {
		let dir = self.dir.clone();
		let len = bytes.len();
		let path = tokio::task::spawn_blocking(move || -> io::Result<TempPath> {
			std::fs::create_dir_all(&dir)?;

			let mut file = tempfile::Builder::new().prefix(STAGED_PREFIX).tempfile_in(&dir)?;

			file.write_all(&bytes)?;
			file.flush()?;

			Ok(file.into_temp_path())
		})
		.await
		.map_err(io::Error::other)??;

		tracing::debug!(path = %path.display(), len, "Staged upload.");

		Ok(StagedUpload {
			location: path.to_path_buf(),
			path: Some(path),
			file_name: file_name.into(),
			content_type: content_type.into(),
			len,
		})
	}
}

/// Handle to a staged upload file.
///
/// The file is removed exactly once: by [`StagedUpload::release`], or when the guard is
/// dropped on any other path. Deletion failures are logged and never surfaced.
#[derive(Debug)]
pub struct StagedUpload {
	location: PathBuf,
	path: Option<TempPath>,
	file_name: String,
	content_type: String,
	len: usize,
}
impl StagedUpload {
	/// On-disk location of the staged bytes.
	pub fn path(&self) -> &Path {
		&self.location
	}

	/// Filename declared by the client.
	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	/// Normalized MIME type declared by the client.
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	/// Staged byte length.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` when the staged payload holds no bytes.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Reads the staged bytes back from disk.
	pub async fn read(&self) -> io::Result<Vec<u8>> {
		tokio::fs::read(&self.location).await
	}

	/// Deletes the staged file now.
	pub fn release(mut self) {
		self.remove();
	}

	fn remove(&mut self) {
		let Some(path) = self.path.take() else { return };

		match path.close() {
			Ok(()) => tracing::debug!(path = %self.location.display(), "Removed staged upload."),
			Err(e) => tracing::warn!(
				path = %self.location.display(),
				error = %e,
				"Failed to delete staged upload."
			),
		}
	}
}
impl Drop for StagedUpload {
	fn drop(&mut self) {
		self.remove();
	}
}

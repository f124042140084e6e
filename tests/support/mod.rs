//! Fixtures shared by the integration tests, layered on `threads_relay::_preludet`.

#![allow(dead_code)]

// std
use std::path::{Path, PathBuf};
// crates.io
use axum_test::{
	TestServer,
	multipart::{MultipartForm, Part},
};
use httpmock::prelude::*;
// self
use threads_relay::{_preludet::*, server};

pub const ACCESS_TOKEN: &str = "IGQ-access-it";

/// Staging directory nested below a fresh temporary root; created lazily by the relay.
pub fn staging_dir() -> (tempfile::TempDir, PathBuf) {
	let root = tempfile::tempdir().expect("Temporary directory should be created.");
	let dir = root.path().join("uploads");

	(root, dir)
}

pub fn app(server: &MockServer, staging: &Path) -> TestServer {
	let state = build_test_state(&server.base_url(), staging);

	TestServer::new(server::router(state).into_make_service()).expect("Test server should start.")
}

/// Files currently left in the staging directory (none when it does not exist).
pub fn staged_files(dir: &Path) -> Vec<PathBuf> {
	std::fs::read_dir(dir)
		.map(|entries| entries.filter_map(|entry| entry.ok()).map(|entry| entry.path()).collect())
		.unwrap_or_default()
}

pub fn image_form(len: usize, mime: &str, caption: &str) -> MultipartForm {
	let part = Part::bytes(axum::body::Bytes::from(vec![b'x'; len]))
		.file_name("photo.png")
		.mime_type(mime.to_owned());

	MultipartForm::new().add_text("caption", caption.to_owned()).add_part("image", part)
}

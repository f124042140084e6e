//! Upload admission and temporary on-disk staging.
//!
//! [`UploadPolicy`] decides which parts are admitted (MIME allow-list, streaming size cap);
//! [`StagingArea`] writes admitted bytes to uniquely named temporary files and hands back a
//! [`StagedUpload`] guard that removes its file exactly once, either through
//! [`StagedUpload::release`] or when dropped.

pub mod policy;
pub mod staged;

pub use policy::*;
pub use staged::*;

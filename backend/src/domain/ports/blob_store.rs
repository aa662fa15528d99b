//! Port for storing uploaded file bytes.
use std::fmt;

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

/// Top-level directory a blob is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobArea {
    Uploads,
    TeamPhotos,
    EventImages,
}

impl BlobArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploads => "uploads",
            Self::TeamPhotos => "team_photos",
            Self::EventImages => "event_images",
        }
    }
}

impl fmt::Display for BlobArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Failures raised by blob store adapters.
    pub enum BlobStoreError {
        /// Writing the blob failed.
        Write { message: String } => "blob write failed: {message}",
        /// The store is misconfigured or unreachable.
        Unavailable { message: String } => "blob store unavailable: {message}",
    }
}

impl From<BlobStoreError> for Error {
    fn from(value: BlobStoreError) -> Self {
        match value {
            BlobStoreError::Write { message } => Self::internal(format!("storing file: {message}")),
            BlobStoreError::Unavailable { message } => {
                Self::service_unavailable(format!("file storage unavailable: {message}"))
            }
        }
    }
}

/// Path-addressed storage for uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` under `area`, deriving a unique name from
    /// `file_name`. Returns the stored path relative to the store root,
    /// e.g. `uploads/3f2a..._poster.png`.
    async fn store(
        &self,
        area: BlobArea,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, BlobStoreError>;
}

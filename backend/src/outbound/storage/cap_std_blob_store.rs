//! Blob store rooted at the media directory.
//!
//! All writes go through a `cap_std::fs::Dir` handle opened once at
//! startup, so a crafted file name can never escape the media root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{BlobArea, BlobStore, BlobStoreError};

/// Longest sanitised file-name suffix kept after the UUID prefix.
const MAX_NAME_CHARS: usize = 100;

/// Stores blobs as `<area>/<uuid>_<name>` beneath a media root.
#[derive(Clone)]
pub struct CapStdBlobStore {
    root: Arc<Dir>,
    root_path: PathBuf,
}

impl CapStdBlobStore {
    /// Create `root` if needed and open it as the capability for all writes.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, BlobStoreError> {
        let root_path = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root_path, ambient_authority()).map_err(|err| {
            BlobStoreError::unavailable(format!("{}: {err}", root_path.display()))
        })?;
        let dir = Dir::open_ambient_dir(&root_path, ambient_authority()).map_err(|err| {
            BlobStoreError::unavailable(format!("{}: {err}", root_path.display()))
        })?;
        Ok(Self {
            root: Arc::new(dir),
            root_path,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

/// Keep the final path component and replace anything outside a
/// conservative character set.
fn sanitise_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[async_trait]
impl BlobStore for CapStdBlobStore {
    async fn store(
        &self,
        area: BlobArea,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, BlobStoreError> {
        let relative = format!(
            "{area}/{}_{}",
            Uuid::new_v4().simple(),
            sanitise_file_name(file_name)
        );
        let root = Arc::clone(&self.root);
        let target = relative.clone();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            root.create_dir_all(area.as_str())?;
            root.write(&target, bytes)
        })
        .await
        .map_err(|err| BlobStoreError::write(err.to_string()))?
        .map_err(|err| BlobStoreError::write(format!("{relative}: {err}")))?;
        debug!(path = %relative, "blob stored");
        Ok(relative)
    }
}

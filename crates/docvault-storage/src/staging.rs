//! Local staging area for uploads awaiting their remote push.
//!
//! A [`StagedFile`] owns its path on disk. It is removed either by an
//! explicit [`StagedFile::purge`] once the upload has been handled, or on
//! drop if the request was abandoned before that point.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::ByteStream;

/// Directory where uploads are written before being pushed remotely.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Open a staging area, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create staging directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory of the staging area.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload to a fresh `<uuid><ext>` file.
    pub async fn stage(&self, original_name: &str, data: Bytes) -> AppResult<StagedFile> {
        let ext = extension_of(original_name);
        let path = self
            .root
            .join(format!("{}{}", uuid::Uuid::new_v4(), ext));

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to stage upload: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), size = data.len(), "Staged upload");
        Ok(StagedFile::from_path(path, original_name))
    }
}

/// An upload held on local disk.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: String,
    purged: bool,
}

impl StagedFile {
    /// Take ownership of an existing file on disk.
    pub fn from_path(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
            purged: false,
        }
    }

    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name the client gave the file.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Extension of the original name including the dot, or `""`.
    pub fn extension(&self) -> &str {
        extension_of(&self.original_name)
    }

    /// Whether the file is still present on disk.
    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Open the staged contents as a stream, returning its length too.
    pub async fn open(&self) -> AppResult<(u64, ByteStream)> {
        let file = fs::File::open(&self.path).await.map_err(|e| self.open_error(e))?;
        let size = file.metadata().await.map_err(|e| self.open_error(e))?.len();
        Ok((size, Box::pin(ReaderStream::new(file))))
    }

    fn open_error(&self, e: std::io::Error) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::missing_input("Staged file is no longer present")
        } else {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to read staged file: {}", self.path.display()),
                e,
            )
        }
    }

    /// Remove the staged file.
    ///
    /// An already missing file counts as removed.
    pub async fn purge(mut self) -> AppResult<()> {
        self.purged = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::LocalCleanupFailed,
                format!("Failed to remove staged file: {}", self.path.display()),
                e,
            )),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.purged {
            return;
        }
        let path = std::mem::take(&mut self.path);
        // Inside a runtime the removal runs on the blocking pool.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let result = fs::remove_file(&path).await;
                    log_abandoned_removal(&path, result);
                });
            }
            Err(_) => {
                let result = std::fs::remove_file(&path);
                log_abandoned_removal(&path, result);
            }
        }
    }
}

fn log_abandoned_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed abandoned staged file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %path.display(),
            kind = %ErrorKind::LocalCleanupFailed,
            error = %e,
            "Abandoned staged file was not removed"
        ),
    }
}

fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[idx..],
        _ => "",
    }
}

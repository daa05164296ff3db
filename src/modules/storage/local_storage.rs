//! Local filesystem blob store
//!
//! Layout: `<base>/<user_id>/<storage name>`. Writes overwrite an existing
//! target; removal of a missing file is reported, not treated as an error.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

/// Result of a best-effort physical delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Missing,
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_directory: PathBuf,
}

impl LocalStorage {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    /// Create the per-user directory (and any parents) if it does not exist
    pub async fn ensure_user_directory(&self, user_id: i64) -> io::Result<PathBuf> {
        let dir = self.base_directory.join(user_id.to_string());
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Copy `reader` into `target`, replacing any existing file.
    /// Returns the number of bytes copied.
    pub async fn write_stream<R>(&self, target: &Path, reader: &mut R) -> io::Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut file = fs::File::create(target).await?;
        let copied = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;

        debug!(path = %target.display(), bytes = copied, "Wrote file");
        Ok(copied)
    }

    /// Size of the file as reported by the filesystem
    pub async fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    pub async fn open(&self, path: &Path) -> io::Result<fs::File> {
        fs::File::open(path).await
    }

    pub async fn remove(&self, path: &Path) -> io::Result<RemoveOutcome> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::Missing),
            Err(e) => Err(e),
        }
    }
}

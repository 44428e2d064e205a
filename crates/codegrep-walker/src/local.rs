//! Local filesystem backend.
//!
//! Adapts the real filesystem to `WalkerFs` through `tokio::fs`.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::{EntryKind, FileInfo, WalkerError, WalkerFs};

/// The local disk, addressed by ordinary paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn file_info(path: &Path, meta: &Metadata) -> FileInfo {
    let file_type = meta.file_type();
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        kind,
        size: if kind == EntryKind::Directory { 0 } else { meta.len() },
        modified: meta.modified().ok(),
    }
}

#[async_trait]
impl WalkerFs for LocalFs {
    async fn symlink_metadata(&self, path: &Path) -> Result<FileInfo, WalkerError> {
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(|e| WalkerError::from_io(path, e))?;
        Ok(file_info(path, &meta))
    }

    async fn metadata(&self, path: &Path) -> Result<FileInfo, WalkerError> {
        let meta = fs::metadata(path)
            .await
            .map_err(|e| WalkerError::from_io(path, e))?;
        Ok(file_info(path, &meta))
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, WalkerError> {
        let mut dir = fs::read_dir(path)
            .await
            .map_err(|e| WalkerError::from_io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| WalkerError::from_io(path, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, WalkerError> {
        fs::read(path).await.map_err(|e| WalkerError::from_io(path, e))
    }

    async fn read_head(&self, path: &Path, limit: usize) -> Result<Vec<u8>, WalkerError> {
        let file = fs::File::open(path)
            .await
            .map_err(|e| WalkerError::from_io(path, e))?;

        let mut buf = Vec::with_capacity(limit);
        file.take(limit as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| WalkerError::from_io(path, e))?;
        Ok(buf)
    }

    async fn absolute(&self, path: &Path) -> Result<PathBuf, WalkerError> {
        std::path::absolute(path).map_err(|e| WalkerError::from_io(path, e))
    }
}

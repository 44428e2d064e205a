//! codegrep-walker: file discovery for code search.
//!
//! Provides:
//! - **IgnoreEngine**: gitignore/rgignore rule chains with a versioned decision cache
//! - **Classifier**: language and binary detection plus an inclusion policy
//! - **Walker**: streaming, cancellable depth-first directory walk with stats
//! - **WalkSettings**: TOML settings file that builds the three above
//!
//! Everything is generic over `WalkerFs`, a small async read-only filesystem
//! trait. `LocalFs` adapts the real filesystem through `tokio::fs`.
//!
//! ```ignore
//! use codegrep_walker::{WalkConfig, Walker};
//! use futures::StreamExt;
//!
//! let walker = Walker::new(WalkConfig::default());
//! let mut stream = walker.walk("src").await?;
//! while let Some(result) = stream.next().await {
//!     println!("{}", result.rel_path.display());
//! }
//! println!("{:?}", walker.stats());
//! ```

pub mod classify;
pub mod ignore;
mod local;
pub mod paths;
pub mod settings;
mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Classifier, Detection, FileType, Language};
pub use ignore::{GlobalIgnore, IgnoreEngine, IgnoreRule, IgnoreStats, common_ignore_tags};
pub use local::LocalFs;
pub use settings::WalkSettings;
pub use walker::{WalkConfig, WalkResult, WalkStats, WalkStream, Walker, walk_all};

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from walking, rule parsing, and classifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid ignore pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("invalid regex {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

impl WalkerError {
    /// Map an `io::Error` on `path` onto the matching variant.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(shown),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(shown),
            _ => Self::Io(format!("{shown}: {err}")),
        }
    }
}

/// What kind of filesystem object an entry is, without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Metadata for one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Base name of the entry.
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileInfo {
    /// Create info for a regular file.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
            modified: None,
        }
    }

    /// Create info for a directory.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: 0,
            modified: None,
        }
    }

    /// Create info for a symbolic link.
    pub fn symlink(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Symlink,
            size: 0,
            modified: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// Minimal read-only filesystem abstraction used by every component.
///
/// Implement this trait to run the engine, classifier, and walker over
/// something other than the local disk (an in-memory tree in tests, an
/// archive, a remote snapshot).
#[async_trait]
pub trait WalkerFs: Send + Sync {
    /// Metadata for `path` without following a final symlink.
    async fn symlink_metadata(&self, path: &Path) -> Result<FileInfo, WalkerError>;

    /// Metadata for `path`, following symlinks.
    async fn metadata(&self, path: &Path) -> Result<FileInfo, WalkerError>;

    /// Names of the entries in a directory, in no particular order.
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, WalkerError>;

    /// Read the full contents of a file into memory.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, WalkerError>;

    /// Read at most `limit` leading bytes of a file.
    ///
    /// The default reads the whole file and truncates; implementations
    /// backed by real I/O should override it.
    async fn read_head(&self, path: &Path, limit: usize) -> Result<Vec<u8>, WalkerError> {
        let mut bytes = self.read_file(path).await?;
        bytes.truncate(limit);
        Ok(bytes)
    }

    /// Resolve `path` to an absolute path without touching symlinks.
    ///
    /// The default accepts absolute paths as-is and rejects relative ones.
    async fn absolute(&self, path: &Path) -> Result<PathBuf, WalkerError> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Err(WalkerError::Io(format!(
                "cannot resolve relative path {}",
                path.display()
            )))
        }
    }
}

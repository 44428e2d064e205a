//! In-memory `WalkerFs` for unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{FileInfo, WalkerError, WalkerFs};

/// In-memory filesystem with files, directories, and symlinks.
///
/// Paths are absolute. Parent directories are created on insert.
/// Individual paths can be marked unreadable to exercise error paths.
#[derive(Default)]
pub struct MemoryFs {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<HashSet<PathBuf>>,
    /// Symlink path → target path.
    symlinks: RwLock<HashMap<PathBuf, PathBuf>>,
    unreadable: RwLock<HashSet<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut dirs = HashSet::new();
        dirs.insert(PathBuf::from("/"));
        Self {
            dirs: RwLock::new(dirs),
            ..Default::default()
        }
    }

    pub async fn add_file(&self, path: &str, content: &[u8]) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.ensure_dirs(parent).await;
        }
        self.files.write().await.insert(path, content.to_vec());
    }

    pub async fn add_dir(&self, path: &str) {
        self.ensure_dirs(Path::new(path)).await;
    }

    pub async fn add_symlink(&self, link: &str, target: &str) {
        let link = PathBuf::from(link);
        if let Some(parent) = link.parent() {
            self.ensure_dirs(parent).await;
        }
        self.symlinks.write().await.insert(link, PathBuf::from(target));
    }

    /// Make stat and list calls on `path` fail with permission denied.
    pub async fn make_unreadable(&self, path: &str) {
        self.unreadable.write().await.insert(PathBuf::from(path));
    }

    async fn ensure_dirs(&self, path: &Path) {
        let mut dirs = self.dirs.write().await;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            dirs.insert(current.clone());
        }
    }

    async fn check_readable(&self, path: &Path) -> Result<(), WalkerError> {
        if self.unreadable.read().await.contains(path) {
            return Err(WalkerError::PermissionDenied(path.display().to_string()));
        }
        Ok(())
    }

    fn name_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string())
    }
}

#[async_trait]
impl WalkerFs for MemoryFs {
    async fn symlink_metadata(&self, path: &Path) -> Result<FileInfo, WalkerError> {
        self.check_readable(path).await?;
        let name = Self::name_of(path);

        if self.symlinks.read().await.contains_key(path) {
            return Ok(FileInfo::symlink(name));
        }
        if let Some(content) = self.files.read().await.get(path) {
            return Ok(FileInfo::file(name, content.len() as u64));
        }
        if self.dirs.read().await.contains(path) {
            return Ok(FileInfo::directory(name));
        }
        Err(WalkerError::NotFound(path.display().to_string()))
    }

    async fn metadata(&self, path: &Path) -> Result<FileInfo, WalkerError> {
        let target = self.symlinks.read().await.get(path).cloned();
        match target {
            Some(target) => {
                let mut info = self.symlink_metadata(&target).await?;
                info.name = Self::name_of(path);
                Ok(info)
            }
            None => self.symlink_metadata(path).await,
        }
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, WalkerError> {
        self.check_readable(path).await?;
        let dir = match self.symlinks.read().await.get(path) {
            Some(target) => target.clone(),
            None => path.to_path_buf(),
        };
        if !self.dirs.read().await.contains(&dir) {
            return Err(WalkerError::NotFound(path.display().to_string()));
        }

        let mut names = HashSet::new();
        let files = self.files.read().await;
        let dirs = self.dirs.read().await;
        let symlinks = self.symlinks.read().await;
        let children = files
            .keys()
            .chain(dirs.iter())
            .chain(symlinks.keys())
            .filter(|p| p.parent() == Some(dir.as_path()) && **p != dir);
        for child in children {
            names.insert(Self::name_of(child));
        }
        Ok(names.into_iter().collect())
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, WalkerError> {
        self.check_readable(path).await?;
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| WalkerError::NotFound(path.display().to_string()))
    }
}

//! Streaming directory walker, generic over `WalkerFs`.
//!
//! A walk is one producer task and one consumer:
//!
//! ```text
//!   Walker::walk(root)
//!     │  resolve + stat root, load the ignore chain
//!     ▼
//!   producer task ──► mpsc(buffer_size) ──► WalkStream ──► caller
//!     │
//!     └──► WalkStats (one per walk, snapshot via Walker::stats)
//! ```
//!
//! The producer descends depth-first in lexical order. Per entry it checks
//! depth, hidden names, ignore rules, and finally the classifier, and only
//! accepted files (plus in-band errors) reach the stream. It checks the
//! cancellation token before every entry and races every send against it,
//! so a cancelled walk stops producing once the buffer is drained. A dropped
//! stream stops the producer at the next entry.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::classify::Classifier;
use crate::ignore::{IgnoreEngine, slash_path};
use crate::{FileInfo, LocalFs, WalkerError, WalkerFs};

/// Default result-stream capacity.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Reserved for parallel traversal; a walk uses a single producer.
    pub workers: usize,
    /// Maximum depth below the root (0 = unlimited).
    pub max_depth: usize,
    /// Reserved; symlinks are reported but never followed.
    pub follow_symlinks: bool,
    /// Include entries whose name (or any parent's) starts with `.`.
    pub include_hidden: bool,
    /// Capacity of the result stream.
    pub buffer_size: usize,
    /// Shared ignore engine; a default one is created on first use.
    pub ignore: Option<Arc<IgnoreEngine>>,
    /// Shared classifier; a default one is created on first use.
    pub classifier: Option<Arc<Classifier>>,
    /// Ad hoc ignore rules applied after the ignore chain is loaded.
    pub ignore_patterns: Vec<String>,
    /// Built-in ignore sets (`go`, `node`, ...) applied after the chain.
    pub common_ignores: Vec<String>,
    pub cancel: CancellationToken,
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_depth: 0,
            follow_symlinks: false,
            include_hidden: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            ignore: None,
            classifier: None,
            ignore_patterns: Vec::new(),
            common_ignores: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }
}

/// One entry delivered by a walk: an accepted file or an in-band error.
#[derive(Debug, Clone)]
pub struct WalkResult {
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub rel_path: PathBuf,
    pub info: Option<FileInfo>,
    pub is_symlink: bool,
    pub error: Option<WalkerError>,
}

impl WalkResult {
    fn accepted(path: PathBuf, rel_path: PathBuf, info: FileInfo) -> Self {
        Self {
            path,
            rel_path,
            is_symlink: info.is_symlink(),
            info: Some(info),
            error: None,
        }
    }

    fn failed(path: PathBuf, rel_path: PathBuf, error: WalkerError) -> Self {
        Self {
            path,
            rel_path,
            info: None,
            is_symlink: false,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Counters for the most recent walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files_found: u64,
    pub files_filtered: u64,
    pub dirs_traversed: u64,
    pub dirs_ignored: u64,
    pub symlinks_found: u64,
    pub errors: u64,
    pub bytes_traversed: u64,
    /// Set when the walk finishes.
    pub duration: Duration,
}

fn lock_stats(stats: &Mutex<WalkStats>) -> MutexGuard<'_, WalkStats> {
    stats.lock().unwrap_or_else(|e| e.into_inner())
}

/// One-shot stream of walk results. Ends when the walk completes or is
/// cancelled.
#[derive(Debug)]
pub struct WalkStream {
    rx: mpsc::Receiver<WalkResult>,
}

impl WalkStream {
    pub async fn next_result(&mut self) -> Option<WalkResult> {
        self.rx.recv().await
    }
}

impl Stream for WalkStream {
    type Item = WalkResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Directory walker.
///
/// Reusable: each `walk` loads the ignore chain afresh, starts fresh
/// stats, and returns a new stream.
#[derive(Debug)]
pub struct Walker<F = LocalFs> {
    fs: Arc<F>,
    config: WalkConfig,
    ignore: OnceLock<Arc<IgnoreEngine>>,
    classifier: OnceLock<Arc<Classifier>>,
    /// Counters of the latest walk; replaced, never reset in place.
    stats: Mutex<Arc<Mutex<WalkStats>>>,
}

impl Walker<LocalFs> {
    /// Create a walker over the local filesystem.
    pub fn new(config: WalkConfig) -> Self {
        Self::with_fs(LocalFs, config)
    }
}

impl<F: WalkerFs + 'static> Walker<F> {
    /// Create a walker over any `WalkerFs`.
    pub fn with_fs(fs: F, mut config: WalkConfig) -> Self {
        if config.workers == 0 {
            config.workers = default_workers();
        }
        if config.buffer_size == 0 {
            config.buffer_size = DEFAULT_BUFFER_SIZE;
        }

        Self {
            fs: Arc::new(fs),
            ignore: config.ignore.clone().map(OnceLock::from).unwrap_or_default(),
            classifier: config.classifier.clone().map(OnceLock::from).unwrap_or_default(),
            config,
            stats: Mutex::new(Arc::new(Mutex::new(WalkStats::default()))),
        }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// The ignore engine walks use, created on first call if none was given.
    pub fn ignore_engine(&self) -> Arc<IgnoreEngine> {
        Arc::clone(self.ignore.get_or_init(|| Arc::new(IgnoreEngine::new())))
    }

    /// The classifier walks use, created on first call if none was given.
    pub fn classifier(&self) -> Arc<Classifier> {
        Arc::clone(self.classifier.get_or_init(|| Arc::new(Classifier::new())))
    }

    /// Snapshot of the current (or last) walk's counters.
    pub fn stats(&self) -> WalkStats {
        lock_stats(&self.current_stats()).clone()
    }

    fn current_stats(&self) -> Arc<Mutex<WalkStats>> {
        Arc::clone(&self.stats.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Start walking `root`.
    ///
    /// Fails before producing a stream if the root cannot be resolved or
    /// stat'd, or if configured ignore patterns are invalid. Everything
    /// after that is reported in-band.
    pub async fn walk(&self, root: impl AsRef<Path>) -> Result<WalkStream, WalkerError> {
        let started = Instant::now();
        let root = self.fs.absolute(root.as_ref()).await?;

        let mut root_info = self.fs.symlink_metadata(&root).await?;
        if root_info.is_symlink() {
            root_info = self.fs.metadata(&root).await?;
        }

        let ignore = self.ignore_engine();
        ignore.load_from_path(&*self.fs, &root).await?;
        for tag in &self.config.common_ignores {
            ignore.add_common_patterns(tag)?;
        }
        for pattern in &self.config.ignore_patterns {
            ignore.add_rule(pattern)?;
        }

        let classifier = self.classifier();
        classifier.set_allow_hidden(self.config.include_hidden);

        // An earlier producer may still be winding down on its own counters.
        let stats = Arc::new(Mutex::new(WalkStats::default()));
        *self.stats.lock().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&stats);

        tracing::debug!(root = %root.display(), max_depth = self.config.max_depth, "walk started");

        let (tx, rx) = mpsc::channel(self.config.buffer_size);
        let producer = Producer {
            fs: Arc::clone(&self.fs),
            ignore,
            classifier,
            stats,
            cancel: self.config.cancel.clone(),
            max_depth: self.config.max_depth,
            include_hidden: self.config.include_hidden,
            root,
            tx,
        };
        tokio::spawn(producer.run(root_info, started));

        Ok(WalkStream { rx })
    }

    /// Walk `root` to completion and collect every accepted file.
    ///
    /// The first in-band error aborts the walk and is returned.
    pub async fn collect(&self, root: impl AsRef<Path>) -> Result<Vec<WalkResult>, WalkerError> {
        let mut stream = self.walk(root).await?;
        let mut results = Vec::new();
        while let Some(result) = stream.next_result().await {
            if let Some(err) = result.error {
                return Err(err);
            }
            results.push(result);
        }
        Ok(results)
    }
}

/// Walk `root` on the local filesystem with default settings and collect
/// every accepted file.
pub async fn walk_all(root: impl AsRef<Path>) -> Result<Vec<WalkResult>, WalkerError> {
    Walker::new(WalkConfig::default()).collect(root).await
}

/// What the producer does after handling one entry.
enum Step {
    Continue,
    Descend,
    Stop,
}

/// A directory being iterated: its sorted entry names.
struct Frame {
    dir: PathBuf,
    entries: std::vec::IntoIter<String>,
}

struct Producer<F> {
    fs: Arc<F>,
    ignore: Arc<IgnoreEngine>,
    classifier: Arc<Classifier>,
    stats: Arc<Mutex<WalkStats>>,
    cancel: CancellationToken,
    max_depth: usize,
    include_hidden: bool,
    root: PathBuf,
    tx: mpsc::Sender<WalkResult>,
}

impl<F: WalkerFs + 'static> Producer<F> {
    async fn run(self, root_info: FileInfo, started: Instant) {
        if root_info.is_dir() {
            self.update(|s| s.dirs_traversed += 1);
            self.descend().await;
        } else {
            self.visit_root_file(root_info).await;
        }

        let stats = {
            let mut stats = lock_stats(&self.stats);
            stats.duration = started.elapsed();
            stats.clone()
        };
        tracing::debug!(
            root = %self.root.display(),
            files = stats.files_found,
            filtered = stats.files_filtered,
            dirs = stats.dirs_traversed,
            errors = stats.errors,
            cancelled = self.cancel.is_cancelled(),
            elapsed_ms = stats.duration.as_millis() as u64,
            "walk finished"
        );
        // Dropping `self.tx` here closes the stream.
    }

    fn update(&self, f: impl FnOnce(&mut WalkStats)) {
        f(&mut lock_stats(&self.stats));
    }

    /// Cancelled, or nobody is reading the stream any more.
    fn stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    async fn visit_root_file(&self, info: FileInfo) {
        if self.stopped() {
            return;
        }
        let rel_path = self
            .root
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.root.clone());

        if self.classifier.should_include(&*self.fs, &self.root, &info).await {
            self.emit(WalkResult::accepted(self.root.clone(), rel_path, info))
                .await;
        } else {
            self.update(|s| s.files_filtered += 1);
        }
    }

    async fn descend(&self) {
        let mut stack = match self.read_dir(&self.root).await {
            Ok(frame) => vec![frame],
            Err(_) => return,
        };

        while let Some(frame) = stack.last_mut() {
            let Some(name) = frame.entries.next() else {
                stack.pop();
                continue;
            };
            if self.stopped() {
                return;
            }

            let path = frame.dir.join(name);
            match self.visit(&path).await {
                Step::Continue => {}
                Step::Descend => match self.read_dir(&path).await {
                    Ok(frame) => stack.push(frame),
                    Err(Step::Stop) => return,
                    Err(_) => {}
                },
                Step::Stop => return,
            }
        }
    }

    /// List and sort a directory. A listing failure is reported in-band.
    async fn read_dir(&self, dir: &Path) -> Result<Frame, Step> {
        match self.fs.list_dir(dir).await {
            Ok(mut names) => {
                names.sort();
                Ok(Frame {
                    dir: dir.to_path_buf(),
                    entries: names.into_iter(),
                })
            }
            Err(err) => {
                self.update(|s| s.errors += 1);
                let result = WalkResult::failed(dir.to_path_buf(), self.rel_path(dir), err);
                Err(self.send(result).await)
            }
        }
    }

    async fn visit(&self, path: &Path) -> Step {
        let rel_path = self.rel_path(path);

        let info = match self.fs.symlink_metadata(path).await {
            Ok(info) => info,
            Err(err) => {
                self.update(|s| s.errors += 1);
                return self
                    .send(WalkResult::failed(path.to_path_buf(), rel_path, err))
                    .await;
            }
        };
        if info.is_symlink() {
            self.update(|s| s.symlinks_found += 1);
        }
        let is_dir = info.is_dir();
        let rel = slash_path(&rel_path);

        let depth = rel.matches('/').count();
        if self.max_depth > 0 && depth > self.max_depth {
            tracing::trace!(path = %rel, depth, "beyond max depth");
            return Step::Continue;
        }

        if !self.include_hidden && is_hidden(&rel) {
            self.update(|s| s.files_filtered += 1);
            return Step::Continue;
        }

        if self.ignore.should_ignore(&rel_path, is_dir) {
            tracing::trace!(path = %rel, is_dir, "ignored");
            self.update(|s| {
                if is_dir {
                    s.dirs_ignored += 1;
                } else {
                    s.files_filtered += 1;
                }
            });
            return Step::Continue;
        }

        if is_dir {
            self.update(|s| s.dirs_traversed += 1);
            return Step::Descend;
        }

        if !self.classifier.should_include(&*self.fs, path, &info).await {
            self.update(|s| s.files_filtered += 1);
            return Step::Continue;
        }

        self.emit(WalkResult::accepted(path.to_path_buf(), rel_path, info))
            .await
    }

    /// Send an accepted file, counting it once it is in the stream.
    async fn emit(&self, result: WalkResult) -> Step {
        let size = result.info.as_ref().map_or(0, |info| info.size);
        let step = self.send(result).await;
        if matches!(step, Step::Continue) {
            self.update(|s| {
                s.files_found += 1;
                s.bytes_traversed += size;
            });
        }
        step
    }

    /// Push a result unless the walk is cancelled or the consumer is gone.
    async fn send(&self, result: WalkResult) -> Step {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Step::Stop,
            sent = self.tx.send(result) => match sent {
                Ok(()) => Step::Continue,
                Err(_) => Step::Stop,
            },
        }
    }

    fn rel_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// True if any segment of a relative path starts with `.`.
fn is_hidden(rel_path: &str) -> bool {
    rel_path.split('/').any(|segment| segment.starts_with('.'))
}

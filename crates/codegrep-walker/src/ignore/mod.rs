//! Gitignore-compatible ignore rule chains.
//!
//! An `IgnoreEngine` holds an ordered list of ignore files: the start
//! directory's `.gitignore`/`.rgignore`, then each ancestor's up to the
//! filesystem root, then the global ignore file, then any ad hoc rule files.
//! Every rule of every file is evaluated in that order and the last match
//! decides, so a later `!pattern` re-includes and a later plain pattern
//! re-excludes.

mod cache;
mod common;
mod rule;

pub use common::{common_ignore_tags, common_patterns};
pub use rule::IgnoreRule;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use cache::DecisionCache;

use crate::paths::{first_regular_file, global_ignore_candidates};
use crate::{WalkerError, WalkerFs};

/// Per-directory ignore file names, in load order.
pub const IGNORE_FILE_NAMES: [&str; 2] = [".gitignore", ".rgignore"];

/// Source name given to ad hoc rule files.
pub const CUSTOM_SOURCE: &str = "custom";

/// One ignore file's rules, in line order.
#[derive(Debug, Clone)]
pub struct IgnoreFile {
    /// Path of the file, or `custom` for ad hoc rules.
    pub source: String,
    pub rules: Vec<IgnoreRule>,
}

impl IgnoreFile {
    /// Parse ignore-file text. Lines that fail to parse are dropped.
    pub fn parse(source: impl Into<String>, content: &str) -> Self {
        let source = source.into();
        let mut rules = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match IgnoreRule::parse(line, source.as_str(), idx + 1) {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    tracing::trace!(
                        source = %source,
                        line = idx + 1,
                        error = %err,
                        "dropping ignore line"
                    );
                }
            }
        }

        Self { source, rules }
    }
}

/// Where the global ignore file comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GlobalIgnore {
    /// Environment override, then the well-known home-directory paths.
    #[default]
    Discover,
    /// A fixed path, loaded if it is a regular file.
    Path(PathBuf),
    /// No global ignore file.
    Disabled,
}

/// Summary of the loaded rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreStats {
    pub files: usize,
    pub rules: usize,
    pub negation_rules: usize,
    pub dir_only_rules: usize,
    pub anchored_rules: usize,
    pub enabled: bool,
    pub cached_decisions: usize,
}

/// Ignore rule chain with a decision cache.
///
/// Safe to query from many tasks at once. Loading, adding rules, and
/// toggling are expected to be serialized against in-flight walks.
#[derive(Debug)]
pub struct IgnoreEngine {
    files: RwLock<Vec<Arc<IgnoreFile>>>,
    cache: DecisionCache,
    enabled: AtomicBool,
    global: GlobalIgnore,
}

impl Default for IgnoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IgnoreEngine {
    /// Create an empty, enabled engine that discovers the global ignore file.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Vec::new()),
            cache: DecisionCache::default(),
            enabled: AtomicBool::new(true),
            global: GlobalIgnore::Discover,
        }
    }

    /// Choose how the global ignore file is found.
    pub fn with_global_ignore(mut self, global: GlobalIgnore) -> Self {
        self.global = global;
        self
    }

    /// Replace the rule set with the ignore chain rooted at `start`.
    ///
    /// Loads `.gitignore` then `.rgignore` from `start` and each ancestor,
    /// then the global ignore file. Missing or unreadable ignore files are
    /// skipped. Fails only if `start` itself cannot be stat'd.
    pub async fn load_from_path<F: WalkerFs + ?Sized>(
        &self,
        fs: &F,
        start: &Path,
    ) -> Result<(), WalkerError> {
        fs.metadata(start).await?;

        let mut loaded = Vec::new();
        let mut current = Some(start);
        while let Some(dir) = current {
            for name in IGNORE_FILE_NAMES {
                if let Some(file) = load_ignore_file(fs, &dir.join(name)).await {
                    loaded.push(Arc::new(file));
                }
            }
            current = dir.parent();
        }

        if let Some(global) = self.global_ignore_path(fs).await
            && let Some(file) = load_ignore_file(fs, &global).await
        {
            loaded.push(Arc::new(file));
        }

        tracing::debug!(start = %start.display(), files = loaded.len(), "loaded ignore chain");

        *self.files.write().unwrap_or_else(|e| e.into_inner()) = loaded;
        self.cache.invalidate();
        Ok(())
    }

    async fn global_ignore_path<F: WalkerFs + ?Sized>(&self, fs: &F) -> Option<PathBuf> {
        match &self.global {
            GlobalIgnore::Discover => first_regular_file(fs, &global_ignore_candidates()).await,
            GlobalIgnore::Path(path) => first_regular_file(fs, std::slice::from_ref(path)).await,
            GlobalIgnore::Disabled => None,
        }
    }

    /// Append one ad hoc rule after everything already loaded.
    pub fn add_rule(&self, pattern: &str) -> Result<(), WalkerError> {
        let rule = IgnoreRule::parse(pattern, CUSTOM_SOURCE, 1)?;
        self.push_file(IgnoreFile {
            source: CUSTOM_SOURCE.to_string(),
            rules: vec![rule],
        });
        Ok(())
    }

    /// Append the built-in ignore set for an ecosystem tag (`go`, `node`, ...).
    pub fn add_common_patterns(&self, tag: &str) -> Result<(), WalkerError> {
        let patterns =
            common_patterns(tag).ok_or_else(|| WalkerError::UnknownLanguage(tag.to_string()))?;

        let rules = patterns
            .iter()
            .enumerate()
            .map(|(idx, pattern)| IgnoreRule::parse(pattern, CUSTOM_SOURCE, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        self.push_file(IgnoreFile {
            source: CUSTOM_SOURCE.to_string(),
            rules,
        });
        Ok(())
    }

    fn push_file(&self, file: IgnoreFile) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(file));
        self.cache.invalidate();
    }

    /// Decide whether a path relative to the walk root is ignored.
    pub fn should_ignore(&self, rel_path: impl AsRef<Path>, is_dir: bool) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let path = slash_path(rel_path.as_ref());
        let version = self.cache.version();
        if let Some(ignored) = self.cache.get(&path, is_dir, version) {
            return ignored;
        }

        let mut ignored = false;
        {
            let files = self.files.read().unwrap_or_else(|e| e.into_inner());
            for rule in files.iter().flat_map(|file| file.rules.iter()) {
                if rule.matches(&path, is_dir) {
                    ignored = !rule.is_negated();
                }
            }
        }

        self.cache.insert(&path, is_dir, version, ignored);
        ignored
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate();
    }

    /// Turn all ignoring on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        self.cache.invalidate();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Sources of the loaded ignore files, in evaluation order.
    pub fn loaded_files(&self) -> Vec<String> {
        self.files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|file| file.source.clone())
            .collect()
    }

    pub fn stats(&self) -> IgnoreStats {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let mut stats = IgnoreStats {
            files: files.len(),
            enabled: self.is_enabled(),
            cached_decisions: self.cache.len(),
            ..Default::default()
        };

        for rule in files.iter().flat_map(|file| file.rules.iter()) {
            stats.rules += 1;
            stats.negation_rules += usize::from(rule.is_negated());
            stats.dir_only_rules += usize::from(rule.is_dir_only());
            stats.anchored_rules += usize::from(rule.is_anchored());
        }
        stats
    }
}

async fn load_ignore_file<F: WalkerFs + ?Sized>(fs: &F, path: &Path) -> Option<IgnoreFile> {
    match fs.metadata(path).await {
        Ok(info) if info.is_file() => {}
        _ => return None,
    }

    match fs.read_file(path).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let file = IgnoreFile::parse(path.display().to_string(), &text);
            tracing::debug!(
                path = %path.display(),
                rules = file.rules.len(),
                "loaded ignore file"
            );
            Some(file)
        }
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "skipping unreadable ignore file"
            );
            None
        }
    }
}

/// Render a relative path with `/` separators.
pub(crate) fn slash_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFs;

    fn engine() -> IgnoreEngine {
        IgnoreEngine::new().with_global_ignore(GlobalIgnore::Disabled)
    }

    #[test]
    fn test_last_match_wins() {
        let engine = engine();
        engine.add_rule("*.tmp").unwrap();
        engine.add_rule("!important.tmp").unwrap();

        assert!(engine.should_ignore("x.tmp", false));
        assert!(!engine.should_ignore("important.tmp", false));

        // A later plain rule excludes again.
        engine.add_rule("important.*").unwrap();
        assert!(engine.should_ignore("important.tmp", false));
    }

    #[test]
    fn test_dir_only_rule() {
        let engine = engine();
        engine.add_rule("build/").unwrap();

        assert!(engine.should_ignore("build", true));
        assert!(engine.should_ignore("build/output.txt", false));
        assert!(!engine.should_ignore("build", false));
    }

    #[test]
    fn test_anchored_rule() {
        let engine = engine();
        engine.add_rule("/root/file").unwrap();

        assert!(engine.should_ignore("root/file", false));
        assert!(!engine.should_ignore("sub/root/file", false));
    }

    #[test]
    fn test_globstar_any_depth() {
        let engine = engine();
        engine.add_rule("**/*.go").unwrap();

        assert!(engine.should_ignore("main.go", false));
        assert!(engine.should_ignore("src/main.go", false));
        assert!(engine.should_ignore("deep/nested/main.go", false));
    }

    #[tokio::test]
    async fn test_gitignore_scenario() {
        let fs = MemoryFs::new();
        fs.add_file(
            "/proj/.gitignore",
            b"# Test gitignore\n*.tmp\nbuild/\n!important.tmp\nsrc/**/*.test\n",
        )
        .await;

        let engine = engine();
        engine.load_from_path(&fs, Path::new("/proj")).await.unwrap();

        assert!(engine.should_ignore("file.tmp", false));
        assert!(!engine.should_ignore("important.tmp", false));
        assert!(engine.should_ignore("build", true));
        assert!(engine.should_ignore("build/output", false));
        assert!(!engine.should_ignore("src", true));
        assert!(!engine.should_ignore("src/file.go", false));
        assert!(engine.should_ignore("src/deep/file.test", false));
        assert!(!engine.should_ignore("regular.txt", false));
    }

    #[tokio::test]
    async fn test_load_walks_ancestors() {
        let fs = MemoryFs::new();
        fs.add_file("/proj/.gitignore", b"*.tmp\nbuild/").await;
        fs.add_file("/proj/sub/.gitignore", b"*.log\n!important.log").await;
        fs.add_file("/proj/.rgignore", b"*.bak").await;

        let engine = engine();
        engine.load_from_path(&fs, Path::new("/proj/sub")).await.unwrap();

        assert_eq!(
            engine.loaded_files(),
            vec![
                "/proj/sub/.gitignore".to_string(),
                "/proj/.gitignore".to_string(),
                "/proj/.rgignore".to_string(),
            ]
        );
        assert!(engine.should_ignore("test.tmp", false));
        assert!(engine.should_ignore("test.log", false));
        assert!(engine.should_ignore("test.bak", false));
        assert!(!engine.should_ignore("important.log", false));
    }

    #[tokio::test]
    async fn test_ancestor_rules_override_nearer_ones() {
        let fs = MemoryFs::new();
        fs.add_file("/proj/sub/.gitignore", b"!keep.log").await;
        fs.add_file("/proj/.gitignore", b"*.log").await;

        let engine = engine();
        engine.load_from_path(&fs, Path::new("/proj/sub")).await.unwrap();

        // The ancestor file is evaluated after the nearer one, so it wins.
        assert!(engine.should_ignore("keep.log", false));
    }

    #[tokio::test]
    async fn test_global_ignore_loaded_last() {
        let fs = MemoryFs::new();
        fs.add_file("/proj/.gitignore", b"*.bak").await;
        fs.add_file("/home/u/.gitignore_global", b"!keep.bak\n*.swp").await;

        let engine = IgnoreEngine::new()
            .with_global_ignore(GlobalIgnore::Path("/home/u/.gitignore_global".into()));
        engine.load_from_path(&fs, Path::new("/proj")).await.unwrap();

        assert_eq!(engine.loaded_files().last().unwrap(), "/home/u/.gitignore_global");
        assert!(engine.should_ignore("x.swp", false));
        assert!(engine.should_ignore("x.bak", false));
        assert!(!engine.should_ignore("keep.bak", false));
    }

    #[tokio::test]
    async fn test_load_replaces_previous_rules() {
        let fs = MemoryFs::new();
        fs.add_dir("/proj").await;

        let engine = engine();
        engine.add_rule("*.tmp").unwrap();
        assert!(engine.should_ignore("a.tmp", false));

        engine.load_from_path(&fs, Path::new("/proj")).await.unwrap();
        assert!(!engine.should_ignore("a.tmp", false));
        assert_eq!(engine.stats().files, 0);
    }

    #[tokio::test]
    async fn test_load_skips_directories_named_like_ignore_files() {
        let fs = MemoryFs::new();
        fs.add_dir("/proj/.gitignore").await;
        fs.add_file("/proj/.rgignore", b"*.bak").await;

        let engine = engine();
        engine.load_from_path(&fs, Path::new("/proj")).await.unwrap();
        assert_eq!(engine.loaded_files(), vec!["/proj/.rgignore".to_string()]);
    }

    #[tokio::test]
    async fn test_load_missing_start_fails() {
        let fs = MemoryFs::new();
        let engine = engine();
        let err = engine.load_from_path(&fs, Path::new("/nope")).await.unwrap_err();
        assert!(matches!(err, WalkerError::NotFound(_)));
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let file = IgnoreFile::parse("x", "*.tmp\n!\n/\n  \n# note\nbuild/\n");
        let patterns: Vec<_> = file.rules.iter().map(|r| r.pattern()).collect();
        assert_eq!(patterns, vec!["*.tmp", "build/"]);
        assert_eq!(file.rules[1].line(), 6);
    }

    #[test]
    fn test_disable_and_reenable() {
        let engine = engine();
        engine.add_rule("*.tmp").unwrap();
        assert!(engine.should_ignore("a.tmp", false));

        engine.set_enabled(false);
        assert!(!engine.should_ignore("a.tmp", false));
        assert!(!engine.stats().enabled);

        engine.set_enabled(true);
        assert!(engine.should_ignore("a.tmp", false));
    }

    #[test]
    fn test_cache_is_idempotent_and_invalidated() {
        let engine = engine();
        engine.add_rule("*.tmp").unwrap();

        assert!(engine.should_ignore("a.tmp", false));
        assert!(engine.should_ignore("a.tmp", false));
        assert!(!engine.should_ignore("a.txt", false));
        assert_eq!(engine.stats().cached_decisions, 2);

        engine.add_rule("!a.tmp").unwrap();
        assert_eq!(engine.stats().cached_decisions, 0);
        assert!(!engine.should_ignore("a.tmp", false));

        engine.clear_cache();
        assert_eq!(engine.stats().cached_decisions, 0);
        assert!(!engine.should_ignore("a.tmp", false));
    }

    #[test]
    fn test_common_patterns() {
        let engine = engine();
        engine.add_common_patterns("rust").unwrap();

        assert!(engine.should_ignore("target", true));
        assert!(engine.should_ignore("target/debug/app", false));
        assert!(engine.should_ignore("Cargo.lock", false));
        assert!(engine.should_ignore("src/lib.rs.bk", false));
        assert!(!engine.should_ignore("src/lib.rs", false));
        assert_eq!(engine.stats().files, 1);
    }

    #[test]
    fn test_java_negation_in_common_set() {
        let engine = engine();
        engine.add_common_patterns("java").unwrap();

        assert!(engine.should_ignore("lib/app.jar", false));
        assert!(!engine.should_ignore("gradle/wrapper/gradle-wrapper.jar", false));
    }

    #[test]
    fn test_unknown_common_tag_changes_nothing() {
        let engine = engine();
        let err = engine.add_common_patterns("cobol").unwrap_err();
        assert_eq!(err, WalkerError::UnknownLanguage("cobol".to_string()));
        assert_eq!(engine.stats().files, 0);
    }

    #[test]
    fn test_invalid_rule_changes_nothing() {
        let engine = engine();
        assert!(engine.add_rule("# not a rule").is_err());
        assert_eq!(engine.stats().files, 0);
    }

    #[test]
    fn test_stats() {
        let engine = engine();
        engine.add_rule("*.tmp").unwrap();
        engine.add_rule("!keep.tmp").unwrap();
        engine.add_rule("/build/").unwrap();

        let stats = engine.stats();
        assert_eq!(stats.files, 3);
        assert_eq!(stats.rules, 3);
        assert_eq!(stats.negation_rules, 1);
        assert_eq!(stats.dir_only_rules, 1);
        assert_eq!(stats.anchored_rules, 1);
        assert!(stats.enabled);
    }
}

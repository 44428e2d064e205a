//! File classification: language detection and the inclusion policy.
//!
//! Detection runs these in order and stops at the first language found:
//!
//! | Detector  | Input                          | Confidence |
//! |-----------|--------------------------------|------------|
//! | Extension | lowercased extension           | 0.8        |
//! | Pattern   | base name, exact then glob     | 0.7        |
//! | MIME      | MIME type of the extension     | 0.6        |
//! | Shebang   | `#!` line of non-binary files  | 0.9        |
//!
//! Binary sniffing runs independently of the above and is informational:
//! it never excludes a file by itself.

mod content;
mod language;

pub use content::{BINARY_THRESHOLD, SNIFF_LEN, is_binary_content, shebang_line};
pub use language::{Language, default_languages, mime_for_extension, mime_matches};

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::{FileInfo, WalkerError, WalkerFs};

/// Default upper size bound: 50 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 50 * 1024 * 1024;

/// Which detector identified a file's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Extension,
    Pattern,
    Mime,
    Shebang,
}

impl Detection {
    pub fn confidence(self) -> f64 {
        match self {
            Detection::Extension => 0.8,
            Detection::Pattern => 0.7,
            Detection::Mime => 0.6,
            Detection::Shebang => 0.9,
        }
    }
}

/// Classification of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileType {
    pub language: Option<Arc<Language>>,
    pub detection: Option<Detection>,
    pub is_binary: bool,
    pub is_text: bool,
    /// MIME type implied by the extension, when known.
    pub mime_type: Option<String>,
    /// 0.0 when no language was detected.
    pub confidence: f64,
}

impl FileType {
    pub fn language_name(&self) -> Option<&str> {
        self.language.as_deref().map(|l| l.name.as_str())
    }
}

#[derive(Debug)]
struct PatternGlob {
    pattern: String,
    matcher: GlobMatcher,
    language: Arc<Language>,
}

#[derive(Debug, Default)]
struct Registry {
    /// Registration order; one entry per lowercased name.
    languages: Vec<Arc<Language>>,
    extensions: HashMap<String, Arc<Language>>,
    exact_patterns: HashMap<String, Arc<Language>>,
    glob_patterns: Vec<PatternGlob>,
}

impl Registry {
    fn add(&mut self, language: Language) {
        let key = language.key();
        let language = Arc::new(language);

        match self.languages.iter_mut().find(|l| l.key() == key) {
            Some(slot) => *slot = Arc::clone(&language),
            None => self.languages.push(Arc::clone(&language)),
        }

        for ext in &language.extensions {
            self.extensions.insert(ext.to_lowercase(), Arc::clone(&language));
        }

        for pattern in &language.patterns {
            let pattern = pattern.to_lowercase();
            self.exact_patterns.insert(pattern.clone(), Arc::clone(&language));
            if !pattern.contains(['*', '?', '[']) {
                continue;
            }

            let matcher = match GlobBuilder::new(&pattern).literal_separator(true).build() {
                Ok(glob) => glob.compile_matcher(),
                Err(err) => {
                    tracing::debug!(pattern = %pattern, error = %err, "skipping file-name glob");
                    continue;
                }
            };
            let entry = PatternGlob {
                pattern,
                matcher,
                language: Arc::clone(&language),
            };
            match self.glob_patterns.iter_mut().find(|g| g.pattern == entry.pattern) {
                Some(slot) => *slot = entry,
                None => self.glob_patterns.push(entry),
            }
        }
    }

    fn by_extension(&self, ext: &str) -> Option<Arc<Language>> {
        if ext.is_empty() {
            return None;
        }
        self.extensions.get(ext).cloned()
    }

    fn by_pattern(&self, file_name: &str) -> Option<Arc<Language>> {
        let file_name = file_name.to_lowercase();
        if let Some(language) = self.exact_patterns.get(&file_name) {
            return Some(Arc::clone(language));
        }
        self.glob_patterns
            .iter()
            .find(|g| g.matcher.is_match(&file_name))
            .map(|g| Arc::clone(&g.language))
    }

    fn by_mime(&self, mime: &str) -> Option<Arc<Language>> {
        self.languages
            .iter()
            .find(|l| l.mime_types.iter().any(|m| mime_matches(m, mime)))
            .cloned()
    }
}

#[derive(Debug, Clone)]
struct Filters {
    included_types: HashSet<String>,
    excluded_types: HashSet<String>,
    included_exts: HashSet<String>,
    excluded_exts: HashSet<String>,
    min_size: u64,
    /// 0 = unlimited
    max_size: u64,
    binary_detection: bool,
    allow_hidden: bool,
    custom_patterns: Vec<Regex>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            included_types: HashSet::new(),
            excluded_types: HashSet::new(),
            included_exts: HashSet::new(),
            excluded_exts: HashSet::new(),
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            binary_detection: true,
            allow_hidden: false,
            custom_patterns: Vec::new(),
        }
    }
}

/// Language detector and inclusion policy.
///
/// Queries take shared locks and may run concurrently. Mutators are
/// meant for setup, before or between walks.
#[derive(Debug)]
pub struct Classifier {
    registry: RwLock<Registry>,
    filters: RwLock<Filters>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// A classifier with the built-in languages and default filters.
    pub fn new() -> Self {
        let mut registry = Registry::default();
        for language in default_languages() {
            registry.add(language.clone());
        }
        Self {
            registry: RwLock::new(registry),
            filters: RwLock::new(Filters::default()),
        }
    }

    /// Preset for source code: common programming languages only, with
    /// binaries, archives, temp files and logs excluded by extension.
    pub fn source_code() -> Self {
        let classifier = Self::new();
        for name in [
            "go",
            "javascript",
            "typescript",
            "python",
            "java",
            "c",
            "c++",
            "rust",
            "c#",
            "ruby",
            "php",
        ] {
            classifier.include_type(name);
        }
        for ext in [".exe", ".dll", ".so", ".dylib", ".class", ".jar", ".tmp", ".log"] {
            classifier.exclude_extension(ext);
        }
        classifier.set_binary_detection(true);
        classifier.set_allow_hidden(false);
        classifier
    }

    /// Preset for text files: common binary, archive and media extensions
    /// are excluded.
    pub fn text_files() -> Self {
        let classifier = Self::new();
        for ext in [
            ".exe", ".dll", ".so", ".dylib", ".a", ".o", ".class", ".jar", ".zip", ".gz", ".tar",
            ".png", ".jpg", ".jpeg", ".gif", ".ico", ".pdf", ".mp3", ".mp4", ".wasm",
        ] {
            classifier.exclude_extension(ext);
        }
        classifier.set_binary_detection(true);
        classifier
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(|e| e.into_inner())
    }

    fn filters(&self) -> RwLockReadGuard<'_, Filters> {
        self.filters.read().unwrap_or_else(|e| e.into_inner())
    }

    fn filters_mut(&self) -> RwLockWriteGuard<'_, Filters> {
        self.filters.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Detect the language and binary/text nature of a file.
    ///
    /// Content is only read for regular files.
    pub async fn detect_type<F: WalkerFs + ?Sized>(
        &self,
        fs: &F,
        path: &Path,
        info: &FileInfo,
    ) -> FileType {
        let name = file_name(path);
        let ext = extension_of(&name);
        let mime = mime_for_extension(&ext);

        let (mut detected, candidates) = {
            let registry = self.registry();
            let detected = registry
                .by_extension(&ext)
                .map(|l| (l, Detection::Extension))
                .or_else(|| registry.by_pattern(&name).map(|l| (l, Detection::Pattern)))
                .or_else(|| {
                    mime.and_then(|m| registry.by_mime(m))
                        .map(|l| (l, Detection::Mime))
                });
            let candidates = if detected.is_none() {
                registry.languages.clone()
            } else {
                Vec::new()
            };
            (detected, candidates)
        };

        let binary_detection = self.filters().binary_detection;
        let head = if info.is_file() && (binary_detection || detected.is_none()) {
            match fs.read_head(path, SNIFF_LEN).await {
                Ok(head) => Some(head),
                Err(err) => {
                    tracing::trace!(path = %path.display(), error = %err, "cannot sniff content");
                    None
                }
            }
        } else {
            None
        };

        let is_binary = binary_detection && head.as_deref().is_some_and(is_binary_content);

        if detected.is_none()
            && !is_binary
            && let Some(line) = head.as_deref().and_then(shebang_line)
        {
            detected = candidates
                .into_iter()
                .find(|l| l.shebangs.iter().any(|s| line.contains(&s.to_lowercase())))
                .map(|l| (l, Detection::Shebang));
        }

        let (language, detection) = detected.unzip();
        FileType {
            language,
            detection,
            is_binary,
            is_text: !is_binary,
            mime_type: mime.map(str::to_string),
            confidence: detection.map_or(0.0, Detection::confidence),
        }
    }

    /// Apply the inclusion policy to a file.
    ///
    /// Size, hidden-name, and extension checks run first; the language
    /// filters only apply when a language was detected.
    pub async fn should_include<F: WalkerFs + ?Sized>(
        &self,
        fs: &F,
        path: &Path,
        info: &FileInfo,
    ) -> bool {
        let name = file_name(path);
        {
            let filters = self.filters();
            if filters.max_size > 0 && info.size > filters.max_size {
                return false;
            }
            if filters.min_size > 0 && info.size < filters.min_size {
                return false;
            }
            if !filters.allow_hidden && name.starts_with('.') {
                return false;
            }

            let ext = extension_of(&name);
            if filters.excluded_exts.contains(&ext) {
                return false;
            }
            if !filters.included_exts.is_empty() && !filters.included_exts.contains(&ext) {
                return false;
            }
        }

        let file_type = self.detect_type(fs, path, info).await;

        let filters = self.filters();
        if let Some(language) = &file_type.language {
            let key = language.key();
            if filters.excluded_types.contains(&key) {
                return false;
            }
            if !filters.included_types.is_empty() && !filters.included_types.contains(&key) {
                return false;
            }
        }

        if let Some(pattern) = filters.custom_patterns.iter().find(|re| re.is_match(&name)) {
            tracing::trace!(file = %name, pattern = %pattern, "matched custom pattern");
        }
        true
    }

    pub fn include_type(&self, name: &str) {
        self.filters_mut().included_types.insert(name.to_lowercase());
    }

    pub fn exclude_type(&self, name: &str) {
        self.filters_mut().excluded_types.insert(name.to_lowercase());
    }

    /// Require one of the included extensions (`rs` and `.rs` are the same).
    pub fn include_extension(&self, ext: &str) {
        self.filters_mut().included_exts.insert(normalize_extension(ext));
    }

    pub fn exclude_extension(&self, ext: &str) {
        self.filters_mut().excluded_exts.insert(normalize_extension(ext));
    }

    /// Inclusive size bounds in bytes; 0 disables a bound.
    pub fn set_size_range(&self, min: u64, max: u64) {
        let mut filters = self.filters_mut();
        filters.min_size = min;
        filters.max_size = max;
    }

    pub fn set_binary_detection(&self, enabled: bool) {
        self.filters_mut().binary_detection = enabled;
    }

    pub fn set_allow_hidden(&self, allow: bool) {
        self.filters_mut().allow_hidden = allow;
    }

    pub fn allows_hidden(&self) -> bool {
        self.filters().allow_hidden
    }

    /// Add a regex matched against base names.
    ///
    /// A match is only traced: it never rejects a file, and files that pass
    /// the other filters are included either way.
    pub fn add_custom_pattern(&self, pattern: &str) -> Result<(), WalkerError> {
        let regex = Regex::new(pattern).map_err(|e| WalkerError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.filters_mut().custom_patterns.push(regex);
        Ok(())
    }

    /// Register a language, replacing any with the same lowercased name.
    pub fn add_language(&self, language: Language) {
        self.registry
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add(language);
    }

    /// Lowercased names of all registered languages, in registration order.
    pub fn supported_languages(&self) -> Vec<String> {
        self.registry().languages.iter().map(|l| l.key()).collect()
    }

    /// Extensions of a language, looked up case-insensitively.
    pub fn language_extensions(&self, name: &str) -> Option<Vec<String>> {
        let key = name.to_lowercase();
        self.registry()
            .languages
            .iter()
            .find(|l| l.key() == key)
            .map(|l| l.extensions.clone())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lowercased suffix from the last `.` of a base name, dot included.
///
/// `.bashrc` has the extension `.bashrc`; `Makefile` has none.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rfind('.')
        .map(|idx| file_name[idx..].to_lowercase())
        .unwrap_or_default()
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') { ext } else { format!(".{ext}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFs;

    async fn detect(classifier: &Classifier, fs: &MemoryFs, path: &str) -> FileType {
        let path = Path::new(path);
        let info = fs.symlink_metadata(path).await.unwrap();
        classifier.detect_type(fs, path, &info).await
    }

    async fn include(classifier: &Classifier, fs: &MemoryFs, path: &str) -> bool {
        let path = Path::new(path);
        let info = fs.symlink_metadata(path).await.unwrap();
        classifier.should_include(fs, path, &info).await
    }

    #[tokio::test]
    async fn test_extension_beats_shebang() {
        let fs = MemoryFs::new();
        fs.add_file("/p/main.go", b"#!/usr/bin/env python3\npackage main\n").await;

        let ft = detect(&Classifier::new(), &fs, "/p/main.go").await;
        assert_eq!(ft.language_name(), Some("Go"));
        assert_eq!(ft.detection, Some(Detection::Extension));
        assert_eq!(ft.confidence, 0.8);
    }

    #[tokio::test]
    async fn test_shebang_only_script() {
        let fs = MemoryFs::new();
        fs.add_file("/p/run", b"#!/usr/bin/env python3\nprint(1)\n").await;
        fs.add_file("/p/deploy", b"#!/bin/bash\necho hi\n").await;

        let classifier = Classifier::new();
        let ft = detect(&classifier, &fs, "/p/run").await;
        assert_eq!(ft.language_name(), Some("Python"));
        assert_eq!(ft.detection, Some(Detection::Shebang));
        assert_eq!(ft.confidence, 0.9);

        let ft = detect(&classifier, &fs, "/p/deploy").await;
        assert_eq!(ft.language_name(), Some("Shell"));
    }

    #[tokio::test]
    async fn test_file_name_patterns() {
        let fs = MemoryFs::new();
        fs.add_file("/p/Makefile", b"all:\n").await;
        fs.add_file("/p/Dockerfile.dev", b"FROM scratch\n").await;
        fs.add_file("/p/Gemfile", b"source 'x'\n").await;

        let classifier = Classifier::new();
        let ft = detect(&classifier, &fs, "/p/Makefile").await;
        assert_eq!(ft.language_name(), Some("Makefile"));
        assert_eq!(ft.confidence, 0.7);

        let ft = detect(&classifier, &fs, "/p/Dockerfile.dev").await;
        assert_eq!(ft.language_name(), Some("Docker"));
        assert_eq!(ft.detection, Some(Detection::Pattern));

        let ft = detect(&classifier, &fs, "/p/Gemfile").await;
        assert_eq!(ft.language_name(), Some("Ruby"));
    }

    #[tokio::test]
    async fn test_mime_fallback() {
        let fs = MemoryFs::new();
        fs.add_file("/p/notes.txt", b"just words\n").await;
        fs.add_file("/p/data.json", b"{}").await;

        let classifier = Classifier::new();
        let ft = detect(&classifier, &fs, "/p/notes.txt").await;
        assert_eq!(ft.language, None);
        assert_eq!(ft.mime_type.as_deref(), Some("text/plain"));

        classifier.add_language(Language::new("Plain").with_mime_types(&["text/plain"]));
        let ft = detect(&classifier, &fs, "/p/notes.txt").await;
        assert_eq!(ft.language_name(), Some("Plain"));
        assert_eq!(ft.detection, Some(Detection::Mime));
        assert_eq!(ft.confidence, 0.6);

        let ft = detect(&classifier, &fs, "/p/data.json").await;
        assert_eq!(ft.language_name(), Some("JSON"));
        assert_eq!(ft.mime_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_binary_blocks_shebang() {
        let fs = MemoryFs::new();
        fs.add_file("/p/blob", b"#!/bin/sh\n\0\0\0").await;

        let ft = detect(&Classifier::new(), &fs, "/p/blob").await;
        assert!(ft.is_binary);
        assert!(!ft.is_text);
        assert_eq!(ft.language, None);
        assert_eq!(ft.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_binary_detection_toggle() {
        let fs = MemoryFs::new();
        fs.add_file("/p/image.bin", &[0x89, b'P', b'N', b'G', 0, 0, 1]).await;

        let classifier = Classifier::new();
        assert!(detect(&classifier, &fs, "/p/image.bin").await.is_binary);

        classifier.set_binary_detection(false);
        let ft = detect(&classifier, &fs, "/p/image.bin").await;
        assert!(!ft.is_binary);
        assert!(ft.is_text);
    }

    #[tokio::test]
    async fn test_unknown_file() {
        let fs = MemoryFs::new();
        fs.add_file("/p/data.xyz", b"hello").await;

        let ft = detect(&Classifier::new(), &fs, "/p/data.xyz").await;
        assert_eq!(ft.language, None);
        assert_eq!(ft.detection, None);
        assert_eq!(ft.mime_type, None);
        assert_eq!(ft.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_size_bounds_inclusive() {
        let fs = MemoryFs::new();
        for n in [9usize, 10, 25, 26] {
            fs.add_file(&format!("/p/f{n}.txt"), &vec![b'a'; n]).await;
        }

        let classifier = Classifier::new();
        classifier.set_size_range(10, 25);
        assert!(!include(&classifier, &fs, "/p/f9.txt").await);
        assert!(include(&classifier, &fs, "/p/f10.txt").await);
        assert!(include(&classifier, &fs, "/p/f25.txt").await);
        assert!(!include(&classifier, &fs, "/p/f26.txt").await);
    }

    #[tokio::test]
    async fn test_default_max_size() {
        let fs = MemoryFs::new();
        let info = FileInfo::file("huge.txt", DEFAULT_MAX_SIZE + 1);
        let classifier = Classifier::new();
        assert!(!classifier.should_include(&fs, Path::new("/p/huge.txt"), &info).await);

        classifier.set_size_range(0, 0);
        fs.add_file("/p/huge.txt", b"x").await;
        assert!(classifier.should_include(&fs, Path::new("/p/huge.txt"), &info).await);
    }

    #[tokio::test]
    async fn test_hidden_files() {
        let fs = MemoryFs::new();
        fs.add_file("/p/.env", b"KEY=1").await;

        let classifier = Classifier::new();
        assert!(!include(&classifier, &fs, "/p/.env").await);
        classifier.set_allow_hidden(true);
        assert!(include(&classifier, &fs, "/p/.env").await);
    }

    #[tokio::test]
    async fn test_extension_filters() {
        let fs = MemoryFs::new();
        fs.add_file("/p/a.rs", b"fn a() {}").await;
        fs.add_file("/p/B.RS", b"fn b() {}").await;
        fs.add_file("/p/c.go", b"package c").await;

        let classifier = Classifier::new();
        classifier.include_extension("rs");
        assert!(include(&classifier, &fs, "/p/a.rs").await);
        assert!(include(&classifier, &fs, "/p/B.RS").await);
        assert!(!include(&classifier, &fs, "/p/c.go").await);

        // Exclusion wins over inclusion.
        classifier.exclude_extension(".RS");
        assert!(!include(&classifier, &fs, "/p/a.rs").await);
    }

    #[tokio::test]
    async fn test_type_filters() {
        let fs = MemoryFs::new();
        fs.add_file("/p/a.go", b"package a").await;
        fs.add_file("/p/b.rs", b"fn b() {}").await;
        fs.add_file("/p/c.xyz", b"???").await;

        let classifier = Classifier::new();
        classifier.exclude_type("Go");
        assert!(!include(&classifier, &fs, "/p/a.go").await);
        assert!(include(&classifier, &fs, "/p/b.rs").await);

        let classifier = Classifier::new();
        classifier.include_type("RUST");
        assert!(!include(&classifier, &fs, "/p/a.go").await);
        assert!(include(&classifier, &fs, "/p/b.rs").await);
        // Files without a detected language are not subject to type filters.
        assert!(include(&classifier, &fs, "/p/c.xyz").await);
    }

    #[tokio::test]
    async fn test_binary_not_auto_excluded() {
        let fs = MemoryFs::new();
        fs.add_file("/p/blob.dat", &[0, 1, 2, 3]).await;
        assert!(include(&Classifier::new(), &fs, "/p/blob.dat").await);
    }

    #[tokio::test]
    async fn test_custom_patterns() {
        let fs = MemoryFs::new();
        fs.add_file("/p/a_test.go", b"package a").await;
        fs.add_file("/p/a.go", b"package a").await;

        let classifier = Classifier::new();
        let err = classifier.add_custom_pattern("(").unwrap_err();
        assert!(matches!(err, WalkerError::InvalidRegex { .. }));

        classifier.add_custom_pattern(r"_test\.go$").unwrap();
        assert!(include(&classifier, &fs, "/p/a_test.go").await);
        assert!(include(&classifier, &fs, "/p/a.go").await);
    }

    #[tokio::test]
    async fn test_add_language_overrides() {
        let fs = MemoryFs::new();
        fs.add_file("/p/x.golang", b"package x").await;

        let classifier = Classifier::new();
        let before = classifier.supported_languages().len();
        classifier.add_language(Language::new("go").with_extensions(&[".GOLANG"]));

        assert_eq!(classifier.supported_languages().len(), before);
        assert_eq!(classifier.language_extensions("GO"), Some(vec![".GOLANG".to_string()]));
        assert_eq!(classifier.language_extensions("nope"), None);

        let ft = detect(&classifier, &fs, "/p/x.golang").await;
        assert_eq!(ft.language_name(), Some("go"));
    }

    #[test]
    fn test_supported_languages() {
        let languages = Classifier::new().supported_languages();
        assert_eq!(languages.len(), 21);
        assert!(languages.contains(&"c#".to_string()));
        assert!(languages.iter().all(|l| *l == l.to_lowercase()));
    }

    #[tokio::test]
    async fn test_source_code_preset() {
        let fs = MemoryFs::new();
        fs.add_file("/p/a.py", b"print(1)").await;
        fs.add_file("/p/notes.md", b"# notes").await;
        fs.add_file("/p/app.log", b"line").await;
        fs.add_file("/p/x.xyz", b"data").await;

        let classifier = Classifier::source_code();
        assert!(include(&classifier, &fs, "/p/a.py").await);
        assert!(!include(&classifier, &fs, "/p/notes.md").await);
        assert!(!include(&classifier, &fs, "/p/app.log").await);
        assert!(include(&classifier, &fs, "/p/x.xyz").await);
    }

    #[tokio::test]
    async fn test_text_files_preset() {
        let fs = MemoryFs::new();
        fs.add_file("/p/logo.png", &[0x89, b'P', b'N', b'G']).await;
        fs.add_file("/p/notes.md", b"# notes").await;

        let classifier = Classifier::text_files();
        assert!(!include(&classifier, &fs, "/p/logo.png").await);
        assert!(include(&classifier, &fs, "/p/notes.md").await);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.RS"), ".rs");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
        assert_eq!(extension_of("Makefile"), "");
    }
}

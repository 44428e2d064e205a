//! Walker settings file.
//!
//! Settings are loaded from `~/.config/codegrep/walker.toml` (the platform
//! config directory). Every field has a default, so a missing file or an
//! empty one behaves like `WalkConfig::default()`.
//!
//! ```toml
//! [walk]
//! max_depth = 8
//! include_hidden = false
//!
//! [ignore]
//! patterns = ["*.snap"]
//! common = ["rust", "node"]
//!
//! [filters]
//! preset = "source_code"
//! exclude_types = ["markdown"]
//!
//! [[filters.languages]]
//! name = "Zig"
//! extensions = [".zig"]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, DEFAULT_MAX_SIZE, Language};
use crate::ignore::{GlobalIgnore, IgnoreEngine};
use crate::walker::{DEFAULT_BUFFER_SIZE, WalkConfig};

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkSettings {
    #[serde(default)]
    pub walk: WalkSection,

    #[serde(default)]
    pub ignore: IgnoreSection,

    #[serde(default)]
    pub filters: FilterSection,
}

/// `[walk]`: traversal options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkSection {
    /// Worker count; 0 picks the available parallelism.
    #[serde(default)]
    pub workers: usize,

    /// Maximum depth below the root; 0 is unlimited.
    #[serde(default)]
    pub max_depth: usize,

    #[serde(default)]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for WalkSection {
    fn default() -> Self {
        Self {
            workers: 0,
            max_depth: 0,
            follow_symlinks: false,
            include_hidden: false,
            buffer_size: default_buffer_size(),
        }
    }
}

/// `[ignore]`: rule sources on top of `.gitignore`/`.rgignore` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreSection {
    /// Honor ignore rules at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Load a global ignore file (discovered unless `global_file` is set).
    #[serde(default = "default_true")]
    pub global: bool,

    /// Fixed global ignore file instead of discovery.
    #[serde(default)]
    pub global_file: Option<PathBuf>,

    /// Extra gitignore-syntax rules.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Built-in rule sets by tag: `go`, `node`, `python`, `java`, `rust`, `common`.
    #[serde(default)]
    pub common: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for IgnoreSection {
    fn default() -> Self {
        Self {
            enabled: true,
            global: true,
            global_file: None,
            patterns: Vec::new(),
            common: Vec::new(),
        }
    }
}

/// `[filters]`: the classifier's inclusion policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSection {
    /// Starting point: `source_code` or `text_files`. Unset means no filters.
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub include_types: Vec<String>,

    #[serde(default)]
    pub exclude_types: Vec<String>,

    #[serde(default)]
    pub include_extensions: Vec<String>,

    #[serde(default)]
    pub exclude_extensions: Vec<String>,

    /// Regexes matched against base names; a match includes the file.
    #[serde(default)]
    pub custom_patterns: Vec<String>,

    #[serde(default)]
    pub min_size: u64,

    /// Largest file size in bytes; 0 is unlimited.
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    #[serde(default = "default_true")]
    pub binary_detection: bool,

    /// Languages registered in addition to the built-in ones.
    #[serde(default)]
    pub languages: Vec<Language>,
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            preset: None,
            include_types: Vec::new(),
            exclude_types: Vec::new(),
            include_extensions: Vec::new(),
            exclude_extensions: Vec::new(),
            custom_patterns: Vec::new(),
            min_size: 0,
            max_size: default_max_size(),
            binary_detection: true,
            languages: Vec::new(),
        }
    }
}

impl WalkSettings {
    /// Load settings from the default path.
    ///
    /// If the file doesn't exist, returns default settings.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// Get the default settings file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "codegrep")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("walker.toml"))
    }

    /// Build the ignore engine described by `[ignore]`.
    ///
    /// Ad hoc patterns and common sets are not added here; the walker
    /// applies them after each reload.
    pub fn ignore_engine(&self) -> IgnoreEngine {
        let global = match (&self.ignore.global_file, self.ignore.global) {
            (_, false) => GlobalIgnore::Disabled,
            (Some(path), true) => GlobalIgnore::Path(path.clone()),
            (None, true) => GlobalIgnore::Discover,
        };
        let engine = IgnoreEngine::new().with_global_ignore(global);
        engine.set_enabled(self.ignore.enabled);
        engine
    }

    /// Build the classifier described by `[filters]`.
    pub fn classifier(&self) -> Result<Classifier> {
        let filters = &self.filters;
        let classifier = match filters.preset.as_deref() {
            None => Classifier::new(),
            Some("source_code") => Classifier::source_code(),
            Some("text_files") => Classifier::text_files(),
            Some(other) => bail!("Unknown filter preset: {other}"),
        };

        for language in &filters.languages {
            classifier.add_language(language.clone());
        }
        for name in &filters.include_types {
            classifier.include_type(name);
        }
        for name in &filters.exclude_types {
            classifier.exclude_type(name);
        }
        for ext in &filters.include_extensions {
            classifier.include_extension(ext);
        }
        for ext in &filters.exclude_extensions {
            classifier.exclude_extension(ext);
        }
        for pattern in &filters.custom_patterns {
            classifier.add_custom_pattern(pattern)?;
        }
        classifier.set_size_range(filters.min_size, filters.max_size);
        classifier.set_binary_detection(filters.binary_detection);

        Ok(classifier)
    }

    /// Build a complete walk configuration.
    pub fn walk_config(&self) -> Result<WalkConfig> {
        Ok(WalkConfig {
            workers: self.walk.workers,
            max_depth: self.walk.max_depth,
            follow_symlinks: self.walk.follow_symlinks,
            include_hidden: self.walk.include_hidden,
            buffer_size: self.walk.buffer_size,
            ignore: Some(Arc::new(self.ignore_engine())),
            classifier: Some(Arc::new(self.classifier()?)),
            ignore_patterns: self.ignore.patterns.clone(),
            common_ignores: self.ignore.common.clone(),
            ..Default::default()
        })
    }
}

//! Well-known paths: the home directory and the global ignore file.
//!
//! The global ignore file is the user-wide counterpart to `.gitignore`.
//! Candidates are checked in order and the first existing regular file wins:
//!
//! | Order | Source |
//! |-------|--------|
//! | 1 | `$CODEGREP_GLOBAL_IGNORE` |
//! | 2 | `~/.gitignore_global` |
//! | 3 | `~/.config/git/ignore` |
//! | 4 | `~/.gitignore` |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::WalkerFs;

/// Environment variable naming an explicit global ignore file.
pub const GLOBAL_IGNORE_ENV: &str = "CODEGREP_GLOBAL_IGNORE";

/// Get the user's home directory.
///
/// Uses the platform's notion of home, falling back to `$HOME`.
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
}

/// Global ignore candidates for the current process environment.
pub fn global_ignore_candidates() -> Vec<PathBuf> {
    global_ignore_candidates_from(std::env::var_os(GLOBAL_IGNORE_ENV), home_dir().as_deref())
}

/// Global ignore candidates for an explicit override value and home directory.
pub fn global_ignore_candidates_from(
    override_path: Option<OsString>,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(4);

    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(path));
    }

    if let Some(home) = home {
        candidates.push(home.join(".gitignore_global"));
        candidates.push(home.join(".config").join("git").join("ignore"));
        candidates.push(home.join(".gitignore"));
    }

    candidates
}

/// Return the first candidate that exists as a regular file.
pub async fn first_regular_file<F: WalkerFs + ?Sized>(
    fs: &F,
    candidates: &[PathBuf],
) -> Option<PathBuf> {
    for candidate in candidates {
        if let Ok(info) = fs.metadata(candidate).await
            && info.is_file()
        {
            return Some(candidate.clone());
        }
    }
    None
}

//! Versioned ignore-decision cache.
//!
//! Every rule-set mutation bumps the version. A lookup only trusts an entry
//! stored under the version the caller read before evaluating, so a decision
//! computed against an old rule set can never be served after a change:
//!
//! ```text
//!   reader                        writer
//!   v = version()                 mutate rules
//!   evaluate rules                invalidate()  ── version += 1, clear
//!   insert(key, v, ignored)  ───► dropped unless version() == v
//! ```

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct DecisionCache {
    version: AtomicU64,
    entries: RwLock<HashMap<(String, bool), (u64, bool)>>,
}

impl DecisionCache {
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn get(&self, path: &str, is_dir: bool, version: u64) -> Option<bool> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        // Borrowed lookups on tuple keys need an owned key.
        match entries.get(&(path.to_string(), is_dir)) {
            Some(&(stored, ignored)) if stored == version => Some(ignored),
            _ => None,
        }
    }

    pub fn insert(&self, path: &str, is_dir: bool, version: u64, ignored: bool) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if self.version() == version {
            entries.insert((path.to_string(), is_dir), (version, ignored));
        }
    }

    /// Drop every entry and move to a new version.
    pub fn invalidate(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.version.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

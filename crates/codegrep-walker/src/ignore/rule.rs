//! A single gitignore-style rule.
//!
//! Parsing strips the `!`, trailing `/`, and leading `/` markers into flags
//! and compiles what is left into a fully anchored regex:
//!
//! | Glob          | Regex        |
//! |---------------|--------------|
//! | `**` (alone)  | `.*`         |
//! | `**/` prefix  | `(?:.*/)?`   |
//! | `/**/` middle | `/(?:.*/)?`  |
//! | `/**` suffix  | `/.*`        |
//! | `*`           | `[^/]*`      |
//! | `?`           | `[^/]`       |
//! | `[!a-z]`      | `[^a-z]`     |
//! | `\x`          | literal `x`  |

use regex::Regex;

use crate::WalkerError;

/// A compiled ignore rule.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The pattern as written, markers included.
    pattern: String,
    regex: Regex,
    negate: bool,
    dir_only: bool,
    anchored: bool,
    /// Ignore file the rule came from, or a synthetic name for ad hoc rules.
    source: String,
    line: usize,
}

impl IgnoreRule {
    /// Parse one pattern.
    ///
    /// Blank and comment lines are rejected; callers reading files skip them
    /// before getting here.
    pub fn parse(
        pattern: &str,
        source: impl Into<String>,
        line: usize,
    ) -> Result<Self, WalkerError> {
        let invalid = |message: &str| WalkerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        };

        if pattern.trim().is_empty() {
            return Err(invalid("empty pattern"));
        }
        if pattern.starts_with('#') {
            return Err(invalid("comment line"));
        }

        let mut body = pattern;

        let negate = match body.strip_prefix('!') {
            Some(rest) => {
                body = rest;
                true
            }
            None => false,
        };

        let dir_only = match body.strip_suffix('/') {
            Some(rest) => {
                body = rest;
                true
            }
            None => false,
        };

        // `**/` means "at any depth", so only other slashes anchor.
        let anchored = match body.strip_prefix('/') {
            Some(rest) => {
                body = rest;
                true
            }
            None => body.contains('/') && !body.starts_with("**/"),
        };

        if body.is_empty() {
            return Err(invalid("pattern has no name to match"));
        }

        let regex = Regex::new(&glob_to_regex(body)).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            negate,
            dir_only,
            anchored,
            source: source.into(),
            line,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled regex source.
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Check a forward-slash path relative to the walk root.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.anchored {
            self.matches_anchored(path, is_dir)
        } else {
            self.matches_floating(path, is_dir)
        }
    }

    fn matches_anchored(&self, path: &str, is_dir: bool) -> bool {
        if self.regex.is_match(path) {
            return !self.dir_only || is_dir;
        }

        // Anything below an ignored directory is ignored too.
        if self.dir_only {
            return path
                .match_indices('/')
                .any(|(idx, _)| self.regex.is_match(&path[..idx]));
        }

        false
    }

    fn matches_floating(&self, path: &str, is_dir: bool) -> bool {
        if self.regex.is_match(path) {
            return !self.dir_only || is_dir;
        }

        let mut start = 0;
        loop {
            let tail = &path[start..];
            let next_slash = tail.find('/');
            let component = next_slash.map_or(tail, |idx| &tail[..idx]);

            // A tail always ends at the entry itself.
            if start > 0 && self.regex.is_match(tail) {
                return !self.dir_only || is_dir;
            }

            if self.regex.is_match(component) {
                let is_last = next_slash.is_none();
                return !(is_last && self.dir_only) || is_dir;
            }

            match next_slash {
                Some(idx) => start += idx + 1,
                None => return false,
            }
        }
    }
}

/// Translate a gitignore glob (markers already stripped) into a regex.
pub(crate) fn glob_to_regex(glob: &str) -> String {
    if glob == "**" {
        return "^.*$".to_string();
    }

    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2 + 8);
    out.push('^');

    let mut i = 0;
    if glob.starts_with("**/") {
        out.push_str("(?:.*/)?");
        i = 3;
    }

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                match chars.get(i + 2).copied() {
                    Some('/') if at_segment_start => {
                        out.push_str("(?:.*/)?");
                        i += 3;
                    }
                    None if at_segment_start => {
                        out.push_str(".*");
                        i += 2;
                    }
                    // `a**b` is just two stars inside one segment.
                    _ => {
                        out.push_str("[^/]*");
                        i += 2;
                    }
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end + 1;
                }
                None => {
                    out.push_str(r"\[");
                    i += 1;
                }
            },
            '\\' if i + 1 < chars.len() => {
                push_literal(&mut out, chars[i + 1]);
                i += 2;
            }
            c => {
                push_literal(&mut out, c);
                i += 1;
            }
        }
    }

    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `open`, if any.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut idx = open + 1;
    if matches!(chars.get(idx).copied(), Some('!' | '^')) {
        idx += 1;
    }
    // `]` first in the class is literal
    if chars.get(idx) == Some(&']') {
        idx += 1;
    }
    chars[idx.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| idx + offset)
}

fn push_class(out: &mut String, inner: &[char]) {
    out.push('[');
    let mut rest = inner;
    if let Some((first, tail)) = rest.split_first()
        && matches!(*first, '!' | '^')
    {
        out.push('^');
        rest = tail;
    }
    for &c in rest {
        // Characters with meaning inside a regex class, ranges aside.
        if matches!(c, '\\' | '[' | ']' | '&' | '~' | '^') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(']');
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

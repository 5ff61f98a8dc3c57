//! Path matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Match the episode lookup path exactly (prefix + hyphenated identifier)
//!
//! # Design Decisions
//! - Matchers see only the resolved path, never host or query
//! - Episode identifiers are checked segment by segment instead of via regex

/// Trait for matching a resolved URL path.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches `<prefix><a>-<b>-<c>-<d>-<e>` where every segment is a non-empty
/// run of ASCII letters and digits, anchored at both ends.
#[derive(Debug, Clone)]
pub struct HyphenatedIdMatcher {
    prefix: String,
    segments: usize,
}

impl HyphenatedIdMatcher {
    pub fn new(prefix: impl Into<String>, segments: usize) -> Self {
        Self {
            prefix: prefix.into(),
            segments,
        }
    }
}

impl Matcher for HyphenatedIdMatcher {
    fn matches(&self, path: &str) -> bool {
        let Some(id) = path.strip_prefix(&self.prefix) else {
            return false;
        };
        let parts: Vec<&str> = id.split('-').collect();
        parts.len() == self.segments
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
    }
}

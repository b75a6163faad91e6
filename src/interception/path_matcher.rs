// src/interception/path_matcher.rs
//! Path-anchored rule resolution
//!
//! Maps rule patterns to rules and resolves them against a concrete access
//! path. A pattern is an anchored full path (`.a.b.c`), a bare segment name
//! (`c`, matching that segment at any depth) or the empty string (catch-all).

use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Ordered segment names from the root to an interception point
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessPath(Vec<String>);

impl AccessPath {
    /// Empty path (the root)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Copy of this path with one more segment
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, or `""` at the root
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// Path without its last segment
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Anchored form: separator-prefixed, separator-joined; `""` at the root
    pub fn anchored(&self, separator: &str) -> String {
        if self.0.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        for segment in &self.0 {
            out.push_str(separator);
            out.push_str(segment);
        }
        out
    }

    /// Segments joined with `separator`, no leading separator
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.anchored("."))
    }
}

/// Which pattern form produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Pattern equal to the anchored path
    Exact,

    /// Pattern equal to the bare segment name
    Wildcard,

    /// Empty pattern
    CatchAll,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Wildcard => "wildcard",
            MatchKind::CatchAll => "catch_all",
        }
    }
}

/// Pattern to rule mapping
#[derive(Clone)]
pub struct RuleMap<R> {
    rules: HashMap<String, R>,
}

impl<R> RuleMap<R> {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for `pattern`
    pub fn insert(&mut self, pattern: impl Into<String>, rule: R) -> Option<R> {
        self.rules.insert(pattern.into(), rule)
    }

    /// Remove the rule for `pattern`
    pub fn remove(&mut self, pattern: &str) -> Option<R> {
        self.rules.remove(pattern)
    }

    pub fn get(&self, pattern: &str) -> Option<&R> {
        self.rules.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Configured patterns, sorted
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        patterns.sort_unstable();
        patterns
    }

    /// Resolve a rule: exact anchored path, then bare name, then catch-all
    pub fn lookup(&self, anchored: &str, name: &str) -> Option<(&R, MatchKind)> {
        if let Some(rule) = self.rules.get(anchored) {
            trace!("Exact rule match for {:?}", anchored);
            return Some((rule, MatchKind::Exact));
        }

        if let Some(rule) = self.rules.get(name) {
            trace!("Wildcard rule match for {:?} at {:?}", name, anchored);
            return Some((rule, MatchKind::Wildcard));
        }

        if let Some(rule) = self.rules.get("") {
            trace!("Catch-all rule match at {:?}", anchored);
            return Some((rule, MatchKind::CatchAll));
        }

        None
    }

    /// [`lookup`](Self::lookup) without the match kind
    pub fn resolve(&self, anchored: &str, name: &str) -> Option<&R> {
        self.lookup(anchored, name).map(|(rule, _)| rule)
    }
}

impl<R> Default for RuleMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RuleMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleMap")
            .field("patterns", &self.patterns())
            .finish()
    }
}

impl<R, P: Into<String>> FromIterator<(P, R)> for RuleMap<R> {
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(p, r)| (p.into(), r)).collect(),
        }
    }
}

//! Ignore rules value object
//!
//! Raw ignore patterns are compiled once per run into a closed set of rule
//! kinds, then evaluated against slash-separated paths relative to the sync
//! root.

use globset::{GlobBuilder, GlobMatcher};
use std::fmt;

/// Patterns used when the configuration does not list any.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".git", ".gitignore", ".env", "*.swp", "*.tmp"];

/// A single compiled ignore pattern.
#[derive(Debug, Clone)]
pub enum IgnoreRule {
    /// Plain name: matches a file or directory with this name anywhere in the path.
    ExactName(String),
    /// Pattern written with a trailing `/`: matches any path segment with this
    /// name, so the directory and everything beneath it.
    DirectoryName(String),
    /// Shell glob (`*`, `?`, `[...]`) matched against the base name only.
    Wildcard(GlobMatcher),
}

impl IgnoreRule {
    /// Compile a raw pattern.
    ///
    /// Returns `Ok(None)` for patterns that are empty once normalized.
    pub fn parse(raw: &str) -> Result<Option<Self>, IgnoreError> {
        let mut pattern = raw.trim();
        pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        pattern = pattern.strip_prefix("./").unwrap_or(pattern);

        let (pattern, is_directory) = match pattern.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (pattern, false),
        };

        if pattern.is_empty() {
            return Ok(None);
        }

        if is_directory {
            return Ok(Some(Self::DirectoryName(pattern.to_string())));
        }

        if pattern.contains('*') {
            let glob = GlobBuilder::new(&literal_braces(pattern))
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|e| IgnoreError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.kind().to_string(),
                })?;
            return Ok(Some(Self::Wildcard(glob.compile_matcher())));
        }

        Ok(Some(Self::ExactName(pattern.to_string())))
    }

    /// Check this rule against a path split into segments.
    ///
    /// `segments` is never empty; its last element is the base name.
    fn matches(&self, segments: &[&str], is_dir: bool) -> bool {
        let (base, ancestors) = match segments.split_last() {
            Some(split) => split,
            None => return false,
        };

        match self {
            Self::ExactName(name) => segments.iter().any(|s| *s == name.as_str()),
            Self::DirectoryName(name) => {
                (is_dir && *base == name.as_str()) || segments.iter().any(|s| *s == name.as_str())
            }
            Self::Wildcard(glob) => glob.is_match(base),
        }
    }

    /// The normalized pattern text.
    pub fn pattern(&self) -> &str {
        match self {
            Self::ExactName(name) | Self::DirectoryName(name) => name,
            Self::Wildcard(glob) => glob.glob().glob(),
        }
    }
}

/// Wrap `{` and `}` in single-character classes so they match literally.
/// Only `*`, `?` and `[...]` are special in a wildcard rule.
fn literal_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    // Characters seen since the opening `[`; None outside a class
    let mut class: Option<usize> = None;
    while let Some(c) = chars.next() {
        match (c, class) {
            ('\\', _) => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            ('[', None) => {
                class = Some(0);
                out.push(c);
                continue;
            }
            ('!' | '^', Some(0)) => {
                out.push(c);
                continue;
            }
            (']', Some(n)) if n > 0 => {
                class = None;
                out.push(c);
                continue;
            }
            ('{' | '}', None) => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
        if let Some(n) = class.as_mut() {
            *n += 1;
        }
    }
    out
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryName(name) => write!(f, "{}/", name),
            other => write!(f, "{}", other.pattern()),
        }
    }
}

/// The compiled rule set for one sync run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// A rule set that ignores nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a list of raw patterns, preserving their order.
    pub fn compile<I, S>(patterns: I) -> Result<Self, IgnoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for raw in patterns {
            if let Some(rule) = IgnoreRule::parse(raw.as_ref())? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// The built-in default rule set.
    pub fn defaults() -> Self {
        Self::compile(DEFAULT_IGNORE_PATTERNS).unwrap_or_default()
    }

    /// Check if a path relative to the sync root should be ignored.
    ///
    /// The root itself (`""` or `"."`) is never ignored.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        let segments: Vec<&str> = relative_path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        if segments.is_empty() {
            return false;
        }

        self.rules.iter().any(|rule| rule.matches(&segments, is_dir))
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Errors that can occur when compiling ignore patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IgnoreError {
    #[error("invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

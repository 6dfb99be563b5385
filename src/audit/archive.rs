// src/audit/archive.rs
// =============================================================================
// This module classifies document paths as archived or current.
//
// Older versions of a documentation tree live under a version directory
// (for example `en/v1/...`). Links found there are still reported, but the
// report can annotate them, or the run can leave them out entirely.
//
// The rule:
// - The pattern is a regular expression matched against whole path segments
// - A path is archived if any of its segments matches
// - A path that never matches is current (this function never fails)
// =============================================================================

use regex::Regex;
use std::path::{Component, Path};

/// Whether a document belongs to a superseded version of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchivalStatus {
    Archived,
    Current,
}

impl ArchivalStatus {
    pub fn is_archived(self) -> bool {
        matches!(self, ArchivalStatus::Archived)
    }
}

/// A compiled version-segment pattern.
#[derive(Debug, Clone)]
pub struct ArchivePattern {
    source: String,
    segment: Regex,
}

impl ArchivePattern {
    /// Compiles `pattern` so that it must match a complete path segment.
    ///
    /// `v1` matches the segment `v1` but not `v10` or `docs-v1`.
    /// Use `v\d+` to treat every numbered version as archived.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let segment = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            segment,
        })
    }

    /// The pattern as the user wrote it (without the anchors we add).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Classifies a path by its segments.
    ///
    /// Callers pass the path relative to the scan root, so directories above
    /// the root (which might happen to be called `v1`) never count.
    pub fn classify_path(&self, path: impl AsRef<Path>) -> ArchivalStatus {
        let archived = path
            .as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment),
                _ => None,
            })
            .any(|segment| self.segment.is_match(&segment.to_string_lossy()));

        if archived {
            ArchivalStatus::Archived
        } else {
            ArchivalStatus::Current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1() -> ArchivePattern {
        ArchivePattern::new("v1").unwrap()
    }

    #[test]
    fn test_leading_version_segment_is_archived() {
        assert_eq!(v1().classify_path("v1/start/guide.md"), ArchivalStatus::Archived);
    }

    #[test]
    fn test_nested_version_segment_is_archived() {
        assert!(v1().classify_path("en/v1/intro.md").is_archived());
    }

    #[test]
    fn test_paths_without_marker_are_current() {
        let pattern = v1();
        assert_eq!(pattern.classify_path("start/guide.md"), ArchivalStatus::Current);
        assert_eq!(pattern.classify_path(""), ArchivalStatus::Current);
        assert_eq!(pattern.classify_path("/"), ArchivalStatus::Current);
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        let pattern = v1();
        assert!(!pattern.classify_path("v10/intro.md").is_archived());
        assert!(!pattern.classify_path("docs-v1/intro.md").is_archived());
        assert!(!pattern.classify_path("start/v1.md").is_archived());
    }

    #[test]
    fn test_general_version_pattern() {
        let pattern = ArchivePattern::new(r"v\d+").unwrap();
        assert!(pattern.classify_path("v2/a.md").is_archived());
        assert!(pattern.classify_path("v13/a.md").is_archived());
        assert!(!pattern.classify_path("current/a.md").is_archived());
        assert_eq!(pattern.as_str(), r"v\d+");
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        // Without the group, `^v1|v2$` would match "v1-anything"
        let pattern = ArchivePattern::new("v1|v2").unwrap();
        assert!(pattern.classify_path("v2/a.md").is_archived());
        assert!(!pattern.classify_path("v1-beta/a.md").is_archived());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(ArchivePattern::new("v(").is_err());
    }
}

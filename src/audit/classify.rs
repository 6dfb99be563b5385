// src/audit/classify.rs
// =============================================================================
// This module puts every extracted link target into a category.
//
// Rules are checked in a fixed order and the first match wins:
// 1. external     - starts with the external-domain marker
// 2. relative     - starts with the relative-root marker (e.g. "start/")
// 3. absolute     - starts with the absolute-root marker (e.g. "/docs/")
// 4. unrecognized - nothing matched (a normal outcome, not an error)
//
// Classification only looks at the target text, so the same target always
// gets the same category no matter which document it came from.
// =============================================================================

use serde::Serialize;
use std::fmt;

/// The bucket a link target falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// Points at the site's external domain
    External,
    /// Starts at the relative documentation root
    Relative,
    /// Starts at the absolute documentation root
    Absolute,
    /// None of the markers matched
    Unrecognized,
}

impl LinkCategory {
    /// Every category, in rule order.
    pub const ALL: [LinkCategory; 4] = [
        LinkCategory::External,
        LinkCategory::Relative,
        LinkCategory::Absolute,
        LinkCategory::Unrecognized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::External => "external",
            LinkCategory::Relative => "relative",
            LinkCategory::Absolute => "absolute",
            LinkCategory::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the audit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLink {
    /// The document the link was found in
    pub source_path: String,
    /// The raw text between the parentheses
    pub target: String,
    pub category: LinkCategory,
    /// Only present when the run annotates archival status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// The ordered prefix rules used by `classify_link`.
#[derive(Debug, Clone)]
pub struct LinkRules {
    // (category, prefix) pairs in evaluation order
    rules: Vec<(LinkCategory, String)>,
}

impl LinkRules {
    pub fn new(
        external_prefix: impl Into<String>,
        relative_prefix: impl Into<String>,
        absolute_prefix: impl Into<String>,
    ) -> Self {
        Self {
            rules: vec![
                (LinkCategory::External, external_prefix.into()),
                (LinkCategory::Relative, relative_prefix.into()),
                (LinkCategory::Absolute, absolute_prefix.into()),
            ],
        }
    }

    /// Returns the category of the first rule whose prefix starts `target`.
    pub fn classify_link(&self, target: &str) -> LinkCategory {
        self.rules
            .iter()
            .find(|(_, prefix)| target.starts_with(prefix.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or(LinkCategory::Unrecognized)
    }

    /// The marker configured for `category` (`None` for unrecognized).
    pub fn prefix(&self, category: LinkCategory) -> Option<&str> {
        self.rules
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, prefix)| prefix.as_str())
    }

    /// Pairs of rules where one marker is a prefix of another.
    ///
    /// Each pair is (earlier rule, later rule). Overlaps are legal, the
    /// earlier rule simply wins, but they usually mean a typo in the config.
    pub fn overlapping_markers(&self) -> Vec<(LinkCategory, LinkCategory)> {
        let mut overlaps = Vec::new();
        for (i, (first, first_prefix)) in self.rules.iter().enumerate() {
            for (second, second_prefix) in &self.rules[i + 1..] {
                if first_prefix.starts_with(second_prefix.as_str())
                    || second_prefix.starts_with(first_prefix.as_str())
                {
                    overlaps.push((*first, *second));
                }
            }
        }
        overlaps
    }
}

// src/report/summary.rs
// Run counters. These are diagnostics only and never part of the report file.

use crate::audit::LinkCategory;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Documents read and scanned
    pub documents: usize,
    /// Documents with at least one link
    pub documents_with_links: usize,
    /// Documents left out because they are archived (skip mode)
    pub archived_skipped: usize,
    /// Entries the walker could not read
    pub skipped: usize,
    /// Rows in the finished report
    pub rows: usize,
    by_category: BTreeMap<LinkCategory, usize>,
}

impl AuditSummary {
    pub fn count(&mut self, category: LinkCategory) {
        *self.by_category.entry(category).or_default() += 1;
    }

    pub fn category(&self, category: LinkCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

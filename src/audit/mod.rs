// src/audit/mod.rs
// =============================================================================
// This module contains the pure link-auditing logic.
//
// Submodules:
// - archive: Decides whether a document path belongs to an archived version
// - extract: Pulls `](target)` link targets out of raw document bytes
// - classify: Puts every target into one of four categories
//
// Nothing in here touches the filesystem or the report. Each piece is a plain
// function (or a small struct holding compiled configuration) so it can be
// tested without building a directory tree.
// =============================================================================

mod archive;
mod classify;
mod extract;

// Re-export public items from submodules
// This lets callers write `audit::extract_links()` instead of
// `audit::extract::extract_links()`
pub use archive::ArchivePattern;
pub use classify::{ClassifiedLink, LinkCategory, LinkRules};
pub use extract::extract_links;

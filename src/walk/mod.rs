// src/walk/mod.rs
// =============================================================================
// This module handles walking the documentation tree.
//
// Features:
// - Bottom-up traversal (subdirectories' files come before the parent's own files)
// - Deterministic order (directories first, then by file name)
// - Optional extension filter
// - Per-file problems become skipped entries instead of aborting the walk
// =============================================================================

mod tree;

// Re-export the walker (it yields tree::Document and tree::SkippedEntry)
pub use tree::TreeWalker;

// src/report/mod.rs
// =============================================================================
// This module owns the audit report artifact.
//
// Submodules:
// - sink: The single writer that appends one row per classified link
// - summary: Counters gathered while the run goes, logged at the end
// =============================================================================

mod sink;
mod summary;

pub use sink::{ReportDestination, ReportFormat, ReportSink};
pub use summary::AuditSummary;

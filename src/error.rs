// src/error.rs
// =============================================================================
// Errors that end an audit run.
//
// Per-file problems (an unreadable file, a symlink cycle) are NOT in here:
// the walker turns those into skipped entries and the run carries on.
// What is left are the failures that make a trustworthy report impossible:
// - Config:      bad root, bad pattern, bad marker, bad delimiter
// - ConfigFile:  the --config file could not be read or parsed
// - ReportOpen:  the report destination cannot be opened for writing
// - ReportWrite: a row could not be written (disk full, closed pipe, ...)
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file {} is not valid: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot open report destination {}: {source}", .path.display())]
    ReportOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("report write failed after {rows_written} row(s) were recorded: {source}")]
    ReportWrite {
        rows_written: usize,
        #[source]
        source: io::Error,
    },
}

impl AuditError {
    pub fn config(message: impl Into<String>) -> Self {
        AuditError::Config(message.into())
    }
}

// src/report/sink.rs
// =============================================================================
// This module writes the audit report.
//
// There is exactly one sink per run:
// - It is opened once, before the first document is read
// - Every classified link is appended as one row
// - Rows are flushed after each document, and at the latest every
//   MAX_UNFLUSHED_ROWS rows, so an interrupted run keeps what it wrote
// - finalize() flushes and closes it
//
// If the run aborts early the sink is simply dropped. Both csv::Writer and
// BufWriter flush themselves on drop, so nothing already recorded is lost.
//
// Formats:
//   csv   -> source_path,target,category[,archived]  (delimiter configurable)
//   jsonl -> {"source_path":..,"target":..,"category":..[,"archived":..]}
// =============================================================================

use crate::audit::ClassifiedLink;
use crate::error::AuditError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Upper bound on rows that may sit in a buffer before we flush.
pub const MAX_UNFLUSHED_ROWS: usize = 256;

const COLUMNS: [&str; 3] = ["source_path", "target", "category"];
const ARCHIVED_COLUMN: &str = "archived";

/// Row format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Delimited text with a header row
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

/// Where the report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Stdout,
    File(PathBuf),
}

impl fmt::Display for ReportDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportDestination::Stdout => f.write_str("<stdout>"),
            ReportDestination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

enum RowWriter {
    Csv(csv::Writer<Box<dyn Write>>),
    Jsonl(BufWriter<Box<dyn Write>>),
}

/// The append-only report writer.
pub struct ReportSink {
    writer: RowWriter,
    annotate_archived: bool,
    rows_written: usize,
    unflushed: usize,
}

impl ReportSink {
    /// Opens `destination` and writes the header (CSV only).
    pub fn open(
        destination: &ReportDestination,
        format: ReportFormat,
        delimiter: u8,
        annotate_archived: bool,
    ) -> Result<Self, AuditError> {
        let out: Box<dyn Write> = match destination {
            ReportDestination::Stdout => Box::new(io::stdout()),
            ReportDestination::File(path) => {
                let file = File::create(path).map_err(|source| AuditError::ReportOpen {
                    path: path.clone(),
                    source,
                })?;
                Box::new(file)
            }
        };

        Self::from_writer(out, format, delimiter, annotate_archived)
    }

    /// Builds a sink on top of any writer.
    pub fn from_writer(
        out: Box<dyn Write>,
        format: ReportFormat,
        delimiter: u8,
        annotate_archived: bool,
    ) -> Result<Self, AuditError> {
        let writer = match format {
            ReportFormat::Csv => RowWriter::Csv(
                csv::WriterBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .from_writer(out),
            ),
            ReportFormat::Jsonl => RowWriter::Jsonl(BufWriter::new(out)),
        };

        let mut sink = Self {
            writer,
            annotate_archived,
            rows_written: 0,
            unflushed: 0,
        };
        sink.write_header()?;
        Ok(sink)
    }

    fn write_header(&mut self) -> Result<(), AuditError> {
        let result = match &mut self.writer {
            RowWriter::Csv(csv) if self.annotate_archived => csv
                .write_record(COLUMNS.iter().chain([&ARCHIVED_COLUMN]))
                .map_err(io::Error::from),
            RowWriter::Csv(csv) => csv.write_record(COLUMNS).map_err(io::Error::from),
            RowWriter::Jsonl(_) => Ok(()),
        };
        result.map_err(|source| self.write_error(source))
    }

    /// Appends one row.
    pub fn record(&mut self, link: &ClassifiedLink) -> Result<(), AuditError> {
        let result = match &mut self.writer {
            RowWriter::Csv(csv) => {
                let base = [
                    link.source_path.as_str(),
                    link.target.as_str(),
                    link.category.as_str(),
                ];
                let written = if self.annotate_archived {
                    let archived = match link.archived {
                        Some(true) => "true",
                        Some(false) => "false",
                        None => "",
                    };
                    csv.write_record(base.iter().chain([&archived]))
                } else {
                    csv.write_record(base)
                };
                written.map_err(io::Error::from)
            }
            RowWriter::Jsonl(out) => serde_json::to_writer(&mut *out, link)
                .map_err(io::Error::from)
                .and_then(|()| out.write_all(b"\n")),
        };
        result.map_err(|source| self.write_error(source))?;

        self.rows_written += 1;
        self.unflushed += 1;
        if self.unflushed >= MAX_UNFLUSHED_ROWS {
            self.flush()?;
        }
        Ok(())
    }

    /// Marks the end of one document's rows and flushes them.
    pub fn end_document(&mut self) -> Result<(), AuditError> {
        if self.unflushed > 0 {
            self.flush()?;
        }
        Ok(())
    }

    /// Flushes everything and closes the destination.
    ///
    /// Returns the number of rows in the finished report.
    pub fn finalize(mut self) -> Result<usize, AuditError> {
        self.flush()?;
        Ok(self.rows_written)
    }

    fn flush(&mut self) -> Result<(), AuditError> {
        let result = match &mut self.writer {
            RowWriter::Csv(csv) => csv.flush(),
            RowWriter::Jsonl(out) => out.flush(),
        };
        result.map_err(|source| self.write_error(source))?;
        self.unflushed = 0;
        Ok(())
    }

    // Rows that are still buffered when a write fails were never persisted
    fn write_error(&self, source: io::Error) -> AuditError {
        AuditError::ReportWrite {
            rows_written: self.rows_written - self.unflushed,
            source,
        }
    }
}

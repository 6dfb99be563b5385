// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every audit setting is optional here. Anything left out falls back to the
// JSON config file given with --config, and then to the built-in defaults
// (see config.rs). That way a flag always wins over the file.
// =============================================================================

use crate::config::ArchiveMode;
use crate::report::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "doc-link-audit",
    version,
    about = "Audit the links in a documentation tree",
    long_about = "doc-link-audit walks a directory of documents, finds every `[label](target)` link, \
                  classifies each target as external, relative, absolute or unrecognized, \
                  and writes one report row per link. Nothing is fetched over the network."
)]
pub struct Cli {
    /// Show debug output on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk a documentation tree and write the link report
    ///
    /// Example: doc-link-audit audit en --output links.csv
    Audit(AuditArgs),

    /// Classify link targets given on the command line
    ///
    /// Example: doc-link-audit classify start/guide /docs/intro ./foo
    Classify {
        /// Link targets to classify
        #[arg(required = true)]
        targets: Vec<String>,

        #[command(flatten)]
        rules: RuleArgs,

        /// JSON config file to read markers from
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// The three markers used to classify link targets.
#[derive(Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// Prefix of links to the external site [default: https://notkaperner]
    #[arg(long)]
    pub external_prefix: Option<String>,

    /// Prefix of relative documentation links [default: start/]
    #[arg(long)]
    pub relative_prefix: Option<String>,

    /// Prefix of absolute documentation links [default: /docs/]
    #[arg(long)]
    pub absolute_prefix: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct AuditArgs {
    /// Root of the documentation tree [default: en]
    pub root: Option<PathBuf>,

    /// JSON config file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Regex a path segment must match for the document to count as archived [default: v1]
    #[arg(long)]
    pub archive_pattern: Option<String>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Write the report to this file instead of stdout ("-" means stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Column delimiter for CSV output, a single ASCII character or "tab" [default: ,]
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Report format [default: csv]
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// What to do with documents under an archived path [default: annotate]
    #[arg(long, value_enum)]
    pub archived: Option<ArchiveMode>,

    /// Only scan files with this extension (repeatable)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_links: bool,
}

// src/config.rs
// =============================================================================
// This module resolves the settings for one audit run.
//
// Sources, highest priority first:
// 1. Command-line flags (cli.rs)
// 2. The JSON file passed with --config
// 3. The defaults below
//
// The result is an AuditConfig value that main.rs hands to the orchestrator.
// Everything that can be checked before touching the report is checked here,
// so a bad root or a bad pattern fails before the report file is created.
// =============================================================================

use crate::audit::{ArchivePattern, LinkRules};
use crate::cli::{AuditArgs, RuleArgs};
use crate::error::AuditError;
use crate::report::{ReportDestination, ReportFormat};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_ROOT: &str = "en";
pub const DEFAULT_ARCHIVE_PATTERN: &str = "v1";
pub const DEFAULT_EXTERNAL_PREFIX: &str = "https://notkaperner";
pub const DEFAULT_RELATIVE_PREFIX: &str = "start/";
pub const DEFAULT_ABSOLUTE_PREFIX: &str = "/docs/";
pub const DEFAULT_DELIMITER: u8 = b',';

/// How archived documents are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveMode {
    /// Report them, with an extra `archived` column
    #[default]
    Annotate,
    /// Leave them out of the report
    Skip,
    /// Report them like any other document, without the extra column
    Ignore,
}

/// The `--config` file. Every key is optional.
///
/// ```json
/// { "root": "en", "relative_prefix": "start/", "format": "jsonl" }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub root: Option<PathBuf>,
    pub archive_pattern: Option<String>,
    pub external_prefix: Option<String>,
    pub relative_prefix: Option<String>,
    pub absolute_prefix: Option<String>,
    pub output: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub format: Option<ReportFormat>,
    pub archived: Option<ArchiveMode>,
    pub extensions: Option<Vec<String>>,
    pub follow_links: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, AuditError> {
        let text = fs::read_to_string(path).map_err(|source| AuditError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| AuditError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if one was given, otherwise an empty file.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, AuditError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub root: PathBuf,
    pub archive: ArchivePattern,
    pub rules: LinkRules,
    pub output: ReportDestination,
    pub delimiter: u8,
    pub format: ReportFormat,
    pub archive_mode: ArchiveMode,
    pub extensions: Vec<String>,
    pub follow_links: bool,
}

impl AuditConfig {
    /// Merges flags, the config file and defaults, then validates the result.
    pub fn from_args(args: &AuditArgs) -> Result<Self, AuditError> {
        let file = ConfigFile::load_optional(args.config.as_deref())?;

        let root = args
            .root
            .clone()
            .or_else(|| file.root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        check_root(&root)?;

        let pattern = args
            .archive_pattern
            .as_deref()
            .or(file.archive_pattern.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE_PATTERN);
        let archive = ArchivePattern::new(pattern).map_err(|e| {
            AuditError::config(format!("invalid archive pattern '{}': {}", pattern, e))
        })?;

        let rules = link_rules(&args.rules, &file)?;

        let output = match args.output.clone().or_else(|| file.output.clone()) {
            Some(path) if path.as_os_str() == "-" => ReportDestination::Stdout,
            Some(path) => ReportDestination::File(path),
            None => ReportDestination::Stdout,
        };

        let delimiter = match args.delimiter.as_deref().or(file.delimiter.as_deref()) {
            Some(text) => parse_delimiter(text)?,
            None => DEFAULT_DELIMITER,
        };

        let extensions = if args.extensions.is_empty() {
            file.extensions.clone().unwrap_or_default()
        } else {
            args.extensions.clone()
        };

        Ok(Self {
            root,
            archive,
            rules,
            output,
            delimiter,
            format: args.format.or(file.format).unwrap_or_default(),
            archive_mode: args.archived.or(file.archived).unwrap_or_default(),
            extensions,
            follow_links: args.follow_links || file.follow_links.unwrap_or(false),
        })
    }
}

/// Builds the classification rules from flags, the config file and defaults.
///
/// Empty markers are rejected because they would match every target.
/// Overlapping markers are allowed (the earlier rule wins) but logged.
pub fn link_rules(args: &RuleArgs, file: &ConfigFile) -> Result<LinkRules, AuditError> {
    let external = pick(&args.external_prefix, &file.external_prefix, DEFAULT_EXTERNAL_PREFIX);
    let relative = pick(&args.relative_prefix, &file.relative_prefix, DEFAULT_RELATIVE_PREFIX);
    let absolute = pick(&args.absolute_prefix, &file.absolute_prefix, DEFAULT_ABSOLUTE_PREFIX);

    for (name, value) in [("external", external), ("relative", relative), ("absolute", absolute)] {
        if value.is_empty() {
            return Err(AuditError::config(format!("the {} prefix must not be empty", name)));
        }
    }

    let rules = LinkRules::new(external, relative, absolute);
    for (first, second) in rules.overlapping_markers() {
        warn!(
            "{} prefix '{}' overlaps {} prefix '{}'; {} wins",
            first,
            rules.prefix(first).unwrap_or_default(),
            second,
            rules.prefix(second).unwrap_or_default(),
            first,
        );
    }

    Ok(rules)
}

fn pick<'a>(flag: &'a Option<String>, file: &'a Option<String>, default: &'a str) -> &'a str {
    flag.as_deref().or(file.as_deref()).unwrap_or(default)
}

fn check_root(root: &Path) -> Result<(), AuditError> {
    let metadata = fs::metadata(root).map_err(|e| {
        AuditError::config(format!("root directory {} is not accessible: {}", root.display(), e))
    })?;

    if !metadata.is_dir() {
        return Err(AuditError::config(format!(
            "root {} is not a directory",
            root.display()
        )));
    }

    fs::read_dir(root).map_err(|e| {
        AuditError::config(format!("root directory {} is not readable: {}", root.display(), e))
    })?;

    Ok(())
}

/// Accepts a single ASCII character, or "tab" / "\t" for a tab.
///
/// The quote character and line breaks are refused: they already mean
/// something in a CSV row.
fn parse_delimiter(text: &str) -> Result<u8, AuditError> {
    match text {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "\"" | "\n" | "\r" => Err(AuditError::config(format!(
            "delimiter cannot be {:?}, it is the CSV quote or a line break",
            text
        ))),
        _ => match text.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(AuditError::config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                text
            ))),
        },
    }
}

// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (diagnostics go to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
//
// The audit itself (run_audit) is one sequential pass:
//   walk -> extract -> classify -> record -> finalize
// Finding unrecognized links is a normal outcome, so it never changes the
// exit code. Only a bad configuration or a failed report write does.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod audit; // src/audit/ - archive, extract and classify logic
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - settings for one run
mod error; // src/error.rs - errors that end a run
mod report; // src/report/ - the report sink and run summary
mod walk; // src/walk/ - directory traversal

use audit::{extract_links, ClassifiedLink, LinkCategory};
use clap::Parser;
use cli::{AuditArgs, Cli, Commands, RuleArgs};
use config::{link_rules, ArchiveMode, AuditConfig, ConfigFile};
use error::AuditError;
use report::{AuditSummary, ReportDestination, ReportSink};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walk::TreeWalker;

// anyhow::Result is like std::result::Result but simpler for applications
use anyhow::Result;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            // Configuration and report errors end up here
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins over -v / -q when it is set
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Audit(args) => handle_audit(&args),
        Commands::Classify {
            targets,
            rules,
            config,
        } => handle_classify(&targets, &rules, config.as_deref()),
    }
}

// Handles the 'audit' subcommand
fn handle_audit(args: &AuditArgs) -> Result<i32> {
    let config = AuditConfig::from_args(args)?;
    let summary = run_audit(&config)?;

    info!(
        "📊 Summary: {} document(s), {} with links, {} skipped, {} archived left out",
        summary.documents, summary.documents_with_links, summary.skipped, summary.archived_skipped
    );
    let breakdown: Vec<String> = LinkCategory::ALL
        .iter()
        .map(|category| format!("{} {}", summary.category(*category), category))
        .collect();
    info!("   {} row(s): {}", summary.rows, breakdown.join(", "));

    Ok(0)
}

// Handles the 'classify' subcommand
// Prints "category<TAB>target" for each target, in the order given
fn handle_classify(targets: &[String], rules: &RuleArgs, config_path: Option<&Path>) -> Result<i32> {
    let file = ConfigFile::load_optional(config_path)?;
    let rules = link_rules(rules, &file)?;

    for target in targets {
        println!("{}\t{}", rules.classify_link(target), target);
    }

    Ok(0)
}

/// Runs one audit and returns its counters.
///
/// The report is opened before the walk starts and finalized after it ends.
/// Files that cannot be read are logged and skipped. A failed report write
/// stops the run; rows flushed before that point stay on disk.
fn run_audit(config: &AuditConfig) -> Result<AuditSummary, AuditError> {
    let annotate = config.archive_mode == ArchiveMode::Annotate;
    let mut sink = ReportSink::open(&config.output, config.format, config.delimiter, annotate)?;

    let mut walker = TreeWalker::new(&config.root)
        .follow_links(config.follow_links)
        .extensions(&config.extensions);
    if let ReportDestination::File(path) = &config.output {
        walker = walker.exclude(path);
    }

    info!("🔍 Scanning documentation tree: {}", walker.root().display());
    debug!(
        "writing report to {}, archive pattern '{}'",
        config.output,
        config.archive.as_str()
    );

    let mut summary = AuditSummary::default();

    for item in walker.documents() {
        let document = match item {
            Ok(document) => document,
            Err(skipped) => {
                warn!("Skipping {}", skipped);
                summary.skipped += 1;
                continue;
            }
        };
        summary.documents += 1;

        let status = config.archive.classify_path(&document.relative_path);
        if status.is_archived() && config.archive_mode == ArchiveMode::Skip {
            debug!("leaving out archived document {}", document.path.display());
            summary.archived_skipped += 1;
            continue;
        }

        let source_path = document.path.display().to_string();
        let mut found = 0;
        for target in extract_links(&document.content) {
            let category = config.rules.classify_link(&target);
            let link = ClassifiedLink {
                source_path: source_path.clone(),
                target,
                category,
                archived: annotate.then(|| status.is_archived()),
            };
            sink.record(&link)?;
            summary.count(category);
            found += 1;
        }

        if found > 0 {
            info!("   {} link(s) found in {}", found, source_path);
            summary.documents_with_links += 1;
        }
        sink.end_document()?;
    }

    summary.rows = sink.finalize()?;
    Ok(summary)
}

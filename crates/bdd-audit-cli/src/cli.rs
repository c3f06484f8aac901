//! Command dispatch for the `bdd-audit` entrypoint.

use std::io::{self, Write};
use std::path::PathBuf;

use bdd_audit::{Project, TagFilter};
use bdd_audit_scanners::{scan_features, scan_step_defs};
use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};

use crate::config::{AuditConfig, LogLevel};
use crate::logging;
use crate::output;

/// Reports over a BDD test suite scanned from disk.
#[derive(Parser)]
#[command(author, version, about)]
pub(crate) struct Cli {
    /// Log verbosity for diagnostics on stderr.
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    /// Column delimiter for rendered report tables.
    #[arg(long, global = true, default_value = "|")]
    delimiter: String,
    /// Tag filter applied before analysis; repeat the flag to require
    /// several filters at once.
    #[arg(long = "tags", value_name = "FILTER", global = true)]
    tags: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

/// Directories holding the suite under audit.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// Directory scanned recursively for `.feature` files.
    #[arg(long, value_name = "DIR")]
    features: PathBuf,
    /// Directory scanned recursively for Rust step definitions.
    #[arg(long, value_name = "DIR")]
    steps: PathBuf,
}

/// Supported report commands.
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Headline counts for the whole suite.
    Summary(ScanArgs),
    /// Steps with no matching step definition.
    Unimplemented(ScanArgs),
    /// Step definitions never matched by any step.
    Unused(ScanArgs),
    /// Scenarios that duplicate an earlier scenario.
    Duplicates(ScanArgs),
    /// Tag usage across features, backgrounds, scenarios, and examples.
    Tags(ScanArgs),
    /// How often each step definition is exercised.
    Usage(ScanArgs),
    /// Step-definition sequences repeated across scenarios.
    Sequences(ScanArgs),
    /// Scenario outlines whose examples can be slimmed down.
    Optimize(ScanArgs),
}

impl Commands {
    fn scan_args(&self) -> &ScanArgs {
        match self {
            Self::Summary(args)
            | Self::Unimplemented(args)
            | Self::Unused(args)
            | Self::Duplicates(args)
            | Self::Tags(args)
            | Self::Usage(args)
            | Self::Sequences(args)
            | Self::Optimize(args) => args,
        }
    }
}

/// Parse arguments, scan the suite, and write the requested report to
/// stdout.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, a scan root is
/// unusable, or the report cannot be written.
pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AuditConfig::from_env()
        .wrap_err("invalid configuration")?
        .apply_overrides(cli.log_level);
    logging::init_logging(&config);

    let filters: Vec<TagFilter> = cli.tags.iter().map(TagFilter::new).collect();
    let project = load_project(cli.command.scan_args(), &filters)?;

    let mut stdout = io::stdout();
    match &cli.command {
        Commands::Summary(_) => {
            output::write_table(&mut stdout, &project.statistics(), &cli.delimiter)?;
        }
        Commands::Unimplemented(_) => {
            output::write_table(&mut stdout, &project.not_implemented_table(), &cli.delimiter)?;
        }
        Commands::Unused(_) => {
            output::write_table(&mut stdout, &project.unused_step_defs_table(), &cli.delimiter)?;
        }
        Commands::Duplicates(_) => {
            output::write_table(
                &mut stdout,
                &project.duplicated_scenarios_table(),
                &cli.delimiter,
            )?;
        }
        Commands::Tags(_) => {
            output::write_table(&mut stdout, &project.tag_usage_table(), &cli.delimiter)?;
        }
        Commands::Usage(_) => {
            output::write_table(&mut stdout, &project.step_def_usage_table(), &cli.delimiter)?;
        }
        Commands::Sequences(_) => {
            let mut sequences = project.repeated_sequences();
            sequences.sort_by_key(|sequence| sequence.usage);
            output::write_sequences(&mut stdout, &sequences)?;
        }
        Commands::Optimize(_) => {
            output::write_outline_rewrites(&mut stdout, &project.optimizable_outlines())?;
        }
    }
    stdout.flush().wrap_err("failed to flush report to stdout")
}

/// Scan both roots, link the suite, and apply any tag filters.
fn load_project(args: &ScanArgs, filters: &[TagFilter]) -> Result<Project> {
    let features = scan_features(&args.features).wrap_err_with(|| {
        format!("failed to scan features under {}", args.features.display())
    })?;
    let step_defs = scan_step_defs(&args.steps).wrap_err_with(|| {
        format!(
            "failed to scan step definitions under {}",
            args.steps.display()
        )
    })?;
    let project = Project::new(features, step_defs);
    if filters.is_empty() {
        return Ok(project);
    }
    Ok(project.apply_tag_filters(filters))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail loudly when argument parsing misbehaves"
)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let cli = Cli::try_parse_from([
            "bdd-audit",
            "summary",
            "--features",
            "features",
            "--steps",
            "steps",
            "--tags",
            "@smoke",
            "--tags",
            "~@wip",
            "--delimiter",
            ";",
        ])
        .expect("arguments parse");
        assert_eq!(cli.delimiter, ";");
        assert_eq!(cli.tags, ["@smoke", "~@wip"]);
        let args = cli.command.scan_args();
        assert_eq!(args.features, PathBuf::from("features"));
        assert_eq!(args.steps, PathBuf::from("steps"));
    }

    #[test]
    fn delimiter_defaults_to_a_pipe() {
        let cli = Cli::try_parse_from([
            "bdd-audit",
            "tags",
            "--features",
            "features",
            "--steps",
            "steps",
        ])
        .expect("arguments parse");
        assert_eq!(cli.delimiter, "|");
        assert!(cli.tags.is_empty());
    }
}

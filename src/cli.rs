//! Command-line driver for corpus validation.
//!
//! The core pipeline produces one [`Validity`] per artifact; this module is
//! the plumbing around it: discover artifacts, build a `Duet` for each,
//! aggregate the classifications, and report. A run exits non-zero when any
//! unit fails or errors.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::discovery::discover_artifacts;
use crate::duet::{Duet, Validity};
use crate::errors::OutcheckError;
use crate::strategy::DEFAULT_CONFIG;

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "outcheck",
    version,
    about = "Validates example output embedded in documentation comments against captured program output."
)]
pub struct OutcheckArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Validate every captured .out artifact under a directory.
    Check {
        /// Root of the artifact corpus.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Emit the run summary as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the full diagnostic rendering for a single artifact.
    Show {
        /// The .out artifact to render.
        #[arg(required = true)]
        artifact: PathBuf,
    },
}

// ============================================================================
// RUN SUMMARY - Aggregated classification counts
// ============================================================================

/// Aggregated outcome counts for one corpus run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub exact: usize,
    pub varying: usize,
    pub execute_to_see: usize,
    pub selected_lines: usize,
    /// Units whose source carries the opt-out marker.
    pub ignored: usize,
    /// Units with no embedded block to check.
    pub unchecked: usize,
    pub failed: usize,
    /// Units that could not be paired or classified at all.
    pub errored: usize,
}

impl RunSummary {
    pub fn record(&mut self, validity: Validity) {
        match validity {
            Validity::Exact => self.exact += 1,
            Validity::Varying => self.varying += 1,
            Validity::ExecuteToSee => self.execute_to_see += 1,
            Validity::SelectedLines => self.selected_lines += 1,
            Validity::Fail => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exact
            + self.varying
            + self.execute_to_see
            + self.selected_lines
            + self.ignored
            + self.unchecked
            + self.failed
            + self.errored
    }

    pub fn passed(&self) -> usize {
        self.exact + self.varying + self.execute_to_see + self.selected_lines
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

// Color constants for terminal output
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

fn colorize(text: &str, color: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = OutcheckArgs::parse();

    match args.command {
        ArgsCommand::Check { path, json } => {
            let summary = run_check(&path, json);
            if !summary.is_clean() {
                process::exit(1);
            }
        }
        ArgsCommand::Show { artifact } => match Duet::new(&artifact, &DEFAULT_CONFIG) {
            Ok(duet) => print!("{}", duet),
            Err(e) => {
                print_error(e);
                process::exit(1);
            }
        },
    }
}

fn print_error(error: OutcheckError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// CORPUS RUN
// ============================================================================

fn run_check(root: &Path, json: bool) -> RunSummary {
    let use_colors = atty::is(atty::Stream::Stdout);
    let mut summary = RunSummary::default();

    for artifact in discover_artifacts(root) {
        let label = artifact.display().to_string();
        let duet = match Duet::new(&artifact, &DEFAULT_CONFIG) {
            Ok(duet) => duet,
            Err(e) => {
                summary.errored += 1;
                println!("{}: {}", colorize("ERROR", RED, use_colors), label);
                print_error(e);
                continue;
            }
        };
        match duet.validate() {
            Ok(Some(validity)) => {
                summary.record(validity);
                report_unit(&duet, validity, &label, use_colors);
            }
            Ok(None) => {
                if duet.ignore {
                    summary.ignored += 1;
                    println!(
                        "{}: {} (opted out)",
                        colorize("SKIP", YELLOW, use_colors),
                        label
                    );
                } else {
                    summary.unchecked += 1;
                    println!(
                        "{}: {} (no embedded output)",
                        colorize("SKIP", YELLOW, use_colors),
                        label
                    );
                }
            }
            Err(e) => {
                summary.errored += 1;
                println!("{}: {}", colorize("ERROR", RED, use_colors), label);
                print_error(e);
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => eprintln!("failed to serialize summary: {}", e),
        }
    } else {
        report_summary(&summary, use_colors);
    }
    summary
}

fn report_unit(duet: &Duet, validity: Validity, label: &str, use_colors: bool) {
    match validity {
        Validity::Exact => {
            println!("{}: {}", colorize("PASS", GREEN, use_colors), label);
        }
        Validity::Varying | Validity::ExecuteToSee | Validity::SelectedLines => {
            println!(
                "{}: {} ({})",
                colorize("PASS", GREEN, use_colors),
                label,
                validity
            );
        }
        Validity::Fail => {
            println!("{}: {}", colorize("FAIL", RED, use_colors), label);
            eprintln!("{}", duet);
        }
    }
}

fn report_summary(summary: &RunSummary, use_colors: bool) {
    println!(
        "\nValidation summary: total {}, {} {}, {} {}, {} {}, {} {}",
        summary.total(),
        colorize("passed", GREEN, use_colors),
        summary.passed(),
        colorize("failed", RED, use_colors),
        summary.failed,
        colorize("skipped", YELLOW, use_colors),
        summary.ignored + summary.unchecked,
        colorize("errored", RED, use_colors),
        summary.errored,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_every_outcome_once() {
        let mut summary = RunSummary::default();
        summary.record(Validity::Exact);
        summary.record(Validity::Varying);
        summary.record(Validity::Fail);
        summary.ignored += 1;
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.passed(), 2);
        assert!(!summary.is_clean());
    }

    #[test]
    fn clean_summary_has_no_failures_or_errors() {
        let mut summary = RunSummary::default();
        summary.record(Validity::ExecuteToSee);
        summary.record(Validity::SelectedLines);
        assert!(summary.is_clean());
    }
}

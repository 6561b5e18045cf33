//! Terminal output helpers for the CLI.
//!
//! Progress lines go to stderr so stdout stays clean for piping the
//! available-domain list.

use console::style;
use domain_probe_lib::{ProgressCallback, RunReport, SkippedSeed};
use std::path::Path;
use std::time::Duration;

/// Announce the expanded candidate set before probing starts.
pub fn display_run_header(candidate_count: usize, raw_count: usize) {
    if raw_count != candidate_count {
        eprintln!(
            "Probing {} candidates ({} before dedup)",
            style(candidate_count).bold(),
            raw_count
        );
    } else {
        eprintln!("Probing {} candidates", style(candidate_count).bold());
    }
}

/// Report seeds that could not be expanded.
pub fn display_skipped(skipped: &[SkippedSeed]) {
    for s in skipped {
        eprintln!(
            "{} skipping seed '{}': {}",
            style("warning:").yellow().bold(),
            s.seed,
            s.reason
        );
    }
}

/// A progress callback printing `(done/total) domain` as candidates finish.
pub fn progress_printer() -> ProgressCallback {
    Box::new(|done, total, domain| {
        eprintln!("{} {}", style(format!("({}/{})", done, total)).dim(), domain);
    })
}

/// Print the available domains (stdout) and the final summary (stderr).
pub fn display_report(report: &RunReport, elapsed: Duration) {
    let available = report.available();

    if available.is_empty() {
        eprintln!("\n{}", style("No available domains found.").yellow());
    } else {
        eprintln!("\n{}", style("Available domains:").green().bold());
        for domain in &available {
            println!("{}", style(domain).green());
        }
    }

    let summary = &report.summary;
    eprintln!(
        "\nSummary: {} analyzed, {} available, {} registered, {} errors ({:.1}s)",
        style(summary.total).bold(),
        style(summary.available).green(),
        style(summary.registered).cyan(),
        if summary.errors > 0 {
            style(summary.errors).red()
        } else {
            style(summary.errors).dim()
        },
        elapsed.as_secs_f64()
    );
}

/// Announce where the available-domain file landed.
pub fn display_output_path(path: &Path) {
    eprintln!("Output file written: {}", style(path.display()).bold());
}

/// Fatal error, printed before a non-zero exit.
pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", style("error:").red().bold(), error);
}

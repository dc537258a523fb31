//! Check-mode reporting.

use crate::drift::{DriftReport, RunOutcome, visible};
use colored::*;

/// Print where a drifting header first departs from its checked-in version.
pub fn print_difference(report: &DriftReport) {
    let Some(diff) = &report.first_difference else {
        return;
    };
    println!(
        "{} Error found in {} - output on line {} is:",
        "x".red(),
        report.path.display(),
        diff.line
    );
    println!("{}", visible(&diff.actual));
    println!("Expected output was:");
    println!("{}", visible(&diff.expected));
}

/// Final verdict of a `--verify` run. Returns true when nothing drifted.
pub fn verify(outcome: &RunOutcome) -> bool {
    if outcome.changed() {
        for report in outcome.changed_files() {
            println!("   {} {}", "~".red(), report.path.display());
        }
        println!(
            "{} Bytecode changes detected - the generated bytecode files are not up to date please run tools/regenByteCode.py\n",
            "x".red()
        );
        false
    } else {
        println!("{} Bytecode is up to date\n", "✓".green());
        true
    }
}

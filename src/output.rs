//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Usage and faults
//!
//! Printed when `-?` is given or the command line has problems. Faults follow
//! the usage text, one per line, in the order they were found:
//!
//! ```text
//! cropscan dev@1a2b3c4
//! Crops image files to a new width and/or height given in centimetres or inches.
//! ...
//!
//! Width parameter is not in the correct format - "abc"
//! At least one file specification must be given.
//! ```
//!
//! ## Per file
//!
//! One line per file, source first, then output:
//!
//! ```text
//! "scans/a.jpg" 1000x800px 8.47x6.77cm => "scans/a-c.jpg" 236x800px 2.00x6.77cm
//! WhatIf: "scans/b.jpg" 1000x800px 8.47x6.77cm => "scans/b.jpg" 236x800px 2.00x6.77cm
//! "scans/c.jpg" no changes are required
//! Cannot read "scans/d.jpg": Processing failed: Failed to read dimensions: ...
//! ```
//!
//! ## Summary
//!
//! ```text
//! Processed 4 file(s): 2 cropped, 1 unchanged, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each kind of output has a `format_*` function (returns `String` or
//! `Vec<String>`) for testability and a `print_*` wrapper that writes to
//! stdout. Format functions are pure: no I/O, no side effects.

use crate::fault::Fault;
use crate::process::{BatchSummary, CropPlan, FileOutcome};
use crate::scan::SearchError;

/// Marks every line that describes a change not actually made.
const WHAT_IF_PREFIX: &str = "WhatIf: ";

// ============================================================================
// Usage and faults
// ============================================================================

/// Help text, headed by the program name and version.
pub fn usage_lines(version: &str) -> Vec<String> {
    let mut lines = vec![format!("cropscan {version}")];
    lines.extend(
        [
            "Crops image files to a new width and/or height given in centimetres or inches.",
            "The crop is anchored at the top-left corner and never enlarges an image.",
            "",
            "cropscan [-?] [-w width] [-h height] [-s suffix] [-r dpi] [-wi] filespec[;filespec] ...",
            "",
            "  -?, --help          Show this help information",
            "  -w, --width LEN     New width for the cropped image",
            "  -h, --height LEN    New height for the cropped image",
            "  -s, --suffix STR    Suffix added to the file name to write a copy",
            "                      instead of overwriting the input file",
            "  -r, --resolution N  Minimum resolution (dpi) assumed for images, default 100, at least 72",
            "  -wi, --whatif       Describe what would be done without changing any file",
            "",
            "  LEN                 A number followed by an optional unit: cm (default),",
            "                      centimetre(s), centimeter(s), in, inch or inches",
            "  filespec            File name or pattern; * and ? match within a directory,",
            "                      ** matches across directories",
            "",
            "Examples:",
            "  cropscan -h 14.85cm *.jpg",
            "  cropscan -h 14.85cm -w 10in *.jpg;*.png",
            "  cropscan -w 4.5in -s -cropped -wi scans/**/*.tif",
        ]
        .map(str::to_string),
    );
    lines
}

pub fn format_faults(faults: &[Fault]) -> Vec<String> {
    faults.iter().map(Fault::to_string).collect()
}

// ============================================================================
// Per-file results
// ============================================================================

fn describe_plan(plan: &CropPlan) -> String {
    let (source_w, source_h) = plan.source_cm();
    let (output_w, output_h) = plan.output_cm();
    format!(
        "\"{}\" {} {}x{}cm => \"{}\" {} {}x{}cm",
        plan.source.display(),
        plan.source_size,
        source_w,
        source_h,
        plan.output.display(),
        plan.output_size,
        output_w,
        output_h
    )
}

/// One line describing what happened to a file.
pub fn format_outcome(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Unchanged(plan) => {
            format!("\"{}\" no changes are required", plan.source.display())
        }
        FileOutcome::Cropped { plan, what_if } => {
            let prefix = if *what_if { WHAT_IF_PREFIX } else { "" };
            format!("{prefix}{}", describe_plan(plan))
        }
        FileOutcome::Failed(error) => error.to_string(),
    }
}

pub fn format_search_error(error: &SearchError) -> String {
    error.to_string()
}

pub fn format_summary(summary: &BatchSummary, what_if: bool) -> String {
    let prefix = if what_if { WHAT_IF_PREFIX } else { "" };
    format!(
        "{prefix}Processed {} file(s): {} cropped, {} unchanged, {} failed",
        summary.total(),
        summary.cropped,
        summary.unchanged,
        summary.failed
    )
}

// ============================================================================
// Printing
// ============================================================================

pub fn print_usage(version: &str) {
    for line in usage_lines(version) {
        println!("{}", line);
    }
}

/// Usage text, a blank line, then every fault.
pub fn print_faults(version: &str, faults: &[Fault]) {
    print_usage(version);
    println!();
    for line in format_faults(faults) {
        println!("{}", line);
    }
}

pub fn print_outcome(outcome: &FileOutcome) {
    println!("{}", format_outcome(outcome));
}

pub fn print_search_errors(errors: &[SearchError]) {
    for error in errors {
        println!("{}", format_search_error(error));
    }
}

pub fn print_summary(summary: &BatchSummary, what_if: bool) {
    println!("{}", format_summary(summary, what_if));
}

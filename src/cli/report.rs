//! Summary printing for each command.
//!
//! Every printer has a `_to` variant taking a writer so the output can be tested.

use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

use colored::Colorize;

use crate::core::pipeline::{FileError, MangleStats, NlsStats, PostprocessStats};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

pub fn print_nls(stats: &NlsStats, out_dir: &Path) {
    print_nls_to(stats, out_dir, &mut io::stdout().lock());
}

pub fn print_nls_to<W: Write>(stats: &NlsStats, out_dir: &Path, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Transformed {} of {} ({}) in {}",
            plural(stats.files_transformed, "file", "files"),
            stats.files_scanned,
            plural(stats.entries, "localize call", "localize calls"),
            format_elapsed(stats.elapsed)
        )
        .green()
    );
    if stats.messages > 0 {
        let _ = writeln!(
            writer,
            "  {} written to {}",
            plural(stats.messages, "message", "messages"),
            out_dir.display().to_string().cyan()
        );
    } else {
        let _ = writeln!(writer, "  no messages found, artifacts not written");
    }
}

pub fn print_postprocess(stats: &PostprocessStats, verbose: bool) {
    print_postprocess_to(stats, verbose, &mut io::stdout().lock());
    print_file_errors_to(&stats.errors, verbose, &mut io::stderr().lock());
}

pub fn print_postprocess_to<W: Write>(stats: &PostprocessStats, verbose: bool, writer: &mut W) {
    let mark = if stats.errors.is_empty() {
        SUCCESS_MARK.green()
    } else {
        FAILURE_MARK.red()
    };
    let _ = writeln!(
        writer,
        "{} Post-processed {} of {}: {} replaced, {} blanked in {}",
        mark,
        plural(stats.files_changed, "file", "files"),
        stats.files_scanned,
        plural(stats.replaced, "placeholder", "placeholders"),
        plural(stats.blanked, "message", "messages"),
        format_elapsed(stats.elapsed)
    );

    if !stats.missing.is_empty() {
        let _ = writeln!(
            writer,
            "{} {} not found in the index",
            "warning:".bold().yellow(),
            plural(stats.missing.len(), "placeholder", "placeholders")
        );
        if verbose {
            for placeholder in &stats.missing {
                let _ = writeln!(writer, "  {}", placeholder);
            }
        }
    }
}

pub fn print_mangle(stats: &MangleStats, verbose: bool) {
    print_mangle_to(stats, &mut io::stdout().lock());
    print_file_errors_to(&stats.errors, verbose, &mut io::stderr().lock());
}

pub fn print_mangle_to<W: Write>(stats: &MangleStats, writer: &mut W) {
    let mark = if stats.errors.is_empty() {
        SUCCESS_MARK.green()
    } else {
        FAILURE_MARK.red()
    };
    let _ = writeln!(
        writer,
        "{} Converted {} of {}: {}, {}, {} in {}",
        mark,
        plural(stats.files_converted, "file", "files"),
        stats.files_scanned,
        plural(stats.classes, "class", "classes"),
        plural(stats.fields, "private name", "private names"),
        plural(stats.edits, "edit", "edits"),
        format_elapsed(stats.elapsed)
    );
    if stats.files_excluded > 0 {
        let _ = writeln!(
            writer,
            "  {} excluded",
            plural(stats.files_excluded, "file", "files")
        );
    }
}

pub fn print_mangle_disabled() {
    println!(
        "{} Private-field conversion is disabled ({} is false)",
        SUCCESS_MARK.green(),
        "mangle.enabled".cyan()
    );
}

/// List failed files in verbose mode, or a one-line count otherwise.
pub fn print_file_errors_to<W: Write>(errors: &[FileError], verbose: bool, writer: &mut W) {
    if errors.is_empty() {
        return;
    }
    if verbose {
        for error in errors {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "error:".bold().red(),
                error.file_path.display(),
                error.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} could not be processed (use {} for details)",
            "warning:".bold().yellow(),
            plural(errors.len(), "file", "files"),
            "-v".cyan()
        );
    }
}

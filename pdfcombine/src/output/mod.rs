//! Output formatting and display for pdfcombine.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Write progress and time-remaining estimates
//! - Merge summaries
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::output::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{
    EtaEstimator, EtaState, NullProgress, ProgressBar, ProgressBarSink, ProgressSink,
    ProgressSnapshot,
};

use crate::merge::MergeReport;
use crate::utils::format_file_size;

/// Display a merge summary to the user.
///
/// # Arguments
///
/// * `formatter` - Output formatter to use
/// * `report` - Report of the finished merge
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    if report.files_skipped > 0 {
        formatter.warning(&format!(
            "{} file(s) were skipped",
            report.files_skipped
        ));
    }

    formatter.success(&format!(
        "Merged {} file(s) into {} ({} pages, {})",
        report.files_merged,
        report.output.display(),
        report.pages_appended + report.blank_pages,
        format_file_size(report.actual_size)
    ));

    formatter.merge_detail("Blank pages", &report.blank_pages.to_string());
    formatter.merge_detail("Estimated size", &format_file_size(report.estimated_size));
    formatter.merge_detail("Time", &format!("{:.2}s", report.elapsed.as_secs_f64()));
}

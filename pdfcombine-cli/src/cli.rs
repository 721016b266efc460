//! CLI argument parsing for pdfcombine.
//!
//! This module defines the command-line interface structure using `clap`.
//! It only depends on `clap` and `std` so the build script can render the
//! man page from it.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reorder PDF files, pick page subsets, and combine them into one document.
///
/// pdfcombine keeps an ordered list of PDF files, optionally restricted to
/// page ranges, and merges them into a single output. Lists can be saved to
/// and loaded from text files.
#[derive(Parser, Debug)]
#[command(name = "pdfcombine")]
#[command(version)]
#[command(about = "Reorder PDF files, pick page subsets, and combine them", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Verbose output - show debug logging and merge statistics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Preferences file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE", env = "PDFCOMBINE_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge PDF files into one document
    ///
    /// Examples:
    ///   pdfcombine merge cover.pdf chapter*.pdf -o book.pdf
    ///   pdfcombine merge --list book.txt -o book.pdf --pages 2:1-3
    Merge(MergeArgs),

    /// Check a page range against a PDF and print the pages it selects
    ///
    /// Example:
    ///   pdfcombine pages report.pdf "1-3, 7, 10-"
    Pages {
        /// PDF file whose page count bounds the range
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Page range, e.g. "1-3,7"
        #[arg(value_name = "RANGE", allow_hyphen_values = true)]
        range: String,
    },

    /// Reorder the entries of a saved list file in place
    ///
    /// Example:
    ///   pdfcombine move book.txt --direction up --select 2,4
    Move {
        /// Saved list file
        #[arg(value_name = "LIST")]
        list: PathBuf,

        /// Where to move the selected entries
        #[arg(short, long, value_enum)]
        direction: DirectionArg,

        /// 1-based positions to move (comma-separated)
        #[arg(short, long, value_name = "N", value_delimiter = ',', required = true)]
        select: Vec<usize>,

        /// Close gaps in a non-contiguous selection (defaults to the preference)
        #[arg(long, value_enum)]
        combine: Option<CombineArg>,
    },

    /// Print a saved list file with its page selections
    List {
        /// Saved list file
        #[arg(value_name = "LIST")]
        list: PathBuf,
    },

    /// Show or change preferences
    Prefs {
        /// Preference action
        #[command(subcommand)]
        action: PrefsAction,
    },
}

/// Arguments of `merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files or glob patterns (in order)
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Load the file list (and page selections) from a saved list file
    ///
    /// Entries from the list come before any FILE arguments.
    #[arg(short, long, value_name = "LIST")]
    pub list: Option<PathBuf>,

    /// Output PDF file path (".pdf" is added when missing)
    ///
    /// Asked for interactively when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Page range for one entry, as POSITION:RANGE (repeatable)
    ///
    /// Examples:
    ///   --pages 1:2-5       # pages 2 to 5 of the first file
    ///   --pages 3:4,1       # pages 4 and 1 of the third file
    #[arg(short, long, value_name = "N:RANGE")]
    pub pages: Vec<String>,

    /// Keep page ranges in the order typed instead of sorting them
    #[arg(long)]
    pub keep_order: bool,

    /// Keep pages that a range selects more than once
    #[arg(long)]
    pub keep_duplicates: bool,

    /// Insert a blank page after every file
    #[arg(long, overrides_with = "no_blank_pages")]
    pub blank_pages: bool,

    /// Do not insert blank pages
    #[arg(long, overrides_with = "blank_pages")]
    pub no_blank_pages: bool,

    /// Compress the output
    #[arg(short, long)]
    pub compress: bool,

    /// Save the final list to this file before merging
    #[arg(long, value_name = "LIST")]
    pub save_list: Option<PathBuf>,

    /// Answer yes to every question
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl MergeArgs {
    /// The blank page choice, if one was given.
    pub fn blank_pages(&self) -> Option<bool> {
        match (self.blank_pages, self.no_blank_pages) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Preference actions.
#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Print every preference
    Show,

    /// Set one preference
    ///
    /// Example:
    ///   pdfcombine prefs set "Add Blank Page Between Files" false
    Set {
        /// Preference name as shown by `prefs show`
        key: String,

        /// New value
        value: String,
    },

    /// Print the preferences file location
    Path,
}

/// Move direction.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    /// To the start of the list
    Top,
    /// One slot towards the start
    Up,
    /// One slot towards the end
    Down,
    /// To the end of the list
    Bottom,
}

/// Combine policy for non-contiguous selections.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineArg {
    /// Always close gaps
    Always,
    /// Ask every time
    Ask,
    /// Keep gaps
    Never,
}

//! Terminal messages for the command-line front end.
//!
//! Status lines go to stdout and problems to stderr. Quiet mode keeps only
//! warnings and errors; verbose mode adds the per-merge details.
//!
//! ```
//! use pdfcombine::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! assert_eq!(formatter.format_entry(2, "b.pdf  [1-3]"), "  2. b.pdf  [1-3]");
//! assert_eq!(formatter.format_field("Compress Output", "false"), "Compress Output = false");
//! ```

use std::io::{self, IsTerminal};

/// Kind of status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Plain progress note.
    Info,
    /// A merge, move or preference change went through.
    Success,
    /// Something was skipped or corrected.
    Warning,
    /// The command failed.
    Error,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
        }
    }
}

/// Prints status messages, list entries and merge details.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// `quiet` hides everything but warnings and errors; `verbose` shows
    /// merge details.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var("TERM").is_ok(),
        }
    }

    /// Warnings and errors only.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Whether quiet mode is on.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Progress note such as "Merging 3 file(s)...".
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.format_message(MessageLevel::Info, message));
        }
    }

    /// Completed operation.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.format_message(MessageLevel::Success, message));
        }
    }

    /// Shown even in quiet mode.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.format_message(MessageLevel::Warning, message));
    }

    /// Shown even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_message(MessageLevel::Error, message));
    }

    /// Render a message with its level prefix, coloured on a terminal.
    pub fn format_message(&self, level: MessageLevel, message: &str) -> String {
        match level.color() {
            Some(color) if self.colored => format!("{color}{}{message}\x1b[0m", level.prefix()),
            _ => format!("{}{message}", level.prefix()),
        }
    }

    /// Heading above a printed file list.
    pub fn heading(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// One file of a list, numbered from 1 as in the merge order.
    pub fn entry(&self, position: usize, text: &str) {
        if !self.quiet {
            println!("{}", self.format_entry(position, text));
        }
    }

    /// `  <position>. <text>`
    pub fn format_entry(&self, position: usize, text: &str) -> String {
        format!("  {position}. {text}")
    }

    /// A named value, such as a preference or a parsed page range.
    pub fn field(&self, name: &str, value: &str) {
        if !self.quiet {
            println!("{}", self.format_field(name, value));
        }
    }

    /// `<name> = <value>`
    pub fn format_field(&self, name: &str, value: &str) -> String {
        format!("{name} = {value}")
    }

    /// Extra merge statistic, printed in verbose mode only.
    pub fn merge_detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

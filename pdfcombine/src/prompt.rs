//! Interaction with the user.
//!
//! The library never talks to a terminal or a window directly. Operations
//! that need a decision from the user take a [`Confirmer`] (yes/no questions
//! and notices) or a [`Prompter`] (which can also pick files) and call it
//! synchronously.

use std::path::PathBuf;

/// Kind of file a picker should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    /// PDF documents (`*.pdf`).
    Pdf,
    /// Saved file lists (`*.txt`).
    Text,
    /// Anything.
    Any,
}

impl FileFilter {
    /// Extension (without the dot) this filter matches, if it restricts one.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Pdf => Some("pdf"),
            Self::Text => Some("txt"),
            Self::Any => None,
        }
    }

    /// Human readable description, e.g. for a dialog title.
    pub fn description(self) -> &'static str {
        match self {
            Self::Pdf => "PDF files",
            Self::Text => "Text files",
            Self::Any => "All files",
        }
    }
}

/// Asks yes/no questions and shows notices.
pub trait Confirmer: Send + Sync {
    /// Ask a yes/no question. Returns `true` for yes.
    fn confirm(&self, title: &str, message: &str) -> bool;

    /// Show a message that only needs to be acknowledged.
    fn notify(&self, title: &str, message: &str);
}

/// A [`Confirmer`] that can also pick files and folders.
///
/// Every picker returns `None` when the user cancels.
pub trait Prompter: Confirmer {
    /// Pick an existing file.
    fn pick_file(&self, filter: FileFilter) -> Option<PathBuf>;

    /// Pick a destination to save to.
    fn pick_save_path(&self, filter: FileFilter) -> Option<PathBuf>;

    /// Pick an existing directory.
    fn pick_directory(&self) -> Option<PathBuf>;
}

/// Answers every question with a fixed reply and never picks anything.
///
/// Useful for headless runs where no one can answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, title: &str, message: &str) -> bool {
        log::debug!("{title}: {message} -> {}", if self.0 { "yes" } else { "no" });
        self.0
    }

    fn notify(&self, title: &str, message: &str) {
        log::info!("{title}: {message}");
    }
}

impl Prompter for FixedAnswer {
    fn pick_file(&self, _filter: FileFilter) -> Option<PathBuf> {
        None
    }

    fn pick_save_path(&self, _filter: FileFilter) -> Option<PathBuf> {
        None
    }

    fn pick_directory(&self) -> Option<PathBuf> {
        None
    }
}

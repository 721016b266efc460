//! Error types for pdfcombine.
//!
//! Every fallible operation in the library returns [`PdfCombineError`].
//! Errors carry enough context (paths, offending input) for the front-end
//! to explain what went wrong and what the user can do about it.
//!
//! # Error Categories
//!
//! - **Input Errors**: malformed page ranges, invalid list files
//! - **File Errors**: missing sources, destinations locked by another program
//! - **PDF Errors**: files that cannot be parsed or pages that do not exist
//! - **Flow Errors**: nothing to merge, user cancelled
//!
//! Non-fatal page-range conditions (empty input, clamped values) are not
//! errors; see [`crate::selection::RangeWarning`].

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfcombine operations.
pub type Result<T> = std::result::Result<T, PdfCombineError>;

/// Main error type for pdfcombine operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfCombineError {
    /// A page-range string (or other user-typed value) is malformed.
    #[error("Invalid input '{input}'\n  Reason: {reason}")]
    InvalidInput {
        /// The offending input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A source file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The destination is locked by another application.
    #[error(
        "The output file is in use by another application: {}\n  Hint: close the file and try again",
        path.display()
    )]
    FileInUse {
        /// Path to the locked file.
        path: PathBuf,
    },

    /// The file has no `%PDF-` header.
    #[error("Not a PDF file: {}", path.display())]
    NotAPdf {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The PDF library could not load a source file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason reported by the PDF library.
        reason: String,
    },

    /// A page index outside the document was requested.
    #[error(
        "Page {page} does not exist in {}\n  The document has {total_pages} page(s)",
        path.display()
    )]
    PageOutOfRange {
        /// Path to the PDF file.
        path: PathBuf,
        /// Requested 1-based page number.
        page: usize,
        /// Total pages in the document.
        total_pages: usize,
    },

    /// The file list is empty.
    #[error("No files in the list to merge")]
    NoFilesToMerge,

    /// A saved list file has a line that cannot be used.
    #[error(
        "Invalid entry in list file: {} at line {line_number}\n  Details: {details}",
        path.display()
    )]
    InvalidListFile {
        /// Path to the list file.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// What is wrong with the line.
        details: String,
    },

    /// A preference key or value is not recognized.
    #[error("Invalid preference: {message}")]
    InvalidPreferences {
        /// Description of the problem.
        message: String,
    },

    /// The user backed out of the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error raised by the PDF library.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Preferences (de)serialization failure.
    #[error("Preferences format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PdfCombineError {
    /// Create an InvalidInput error.
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a FileInUse error.
    pub fn file_in_use(path: impl Into<PathBuf>) -> Self {
        Self::FileInUse { path: path.into() }
    }

    /// Create a NotAPdf error.
    pub fn not_a_pdf(path: impl Into<PathBuf>) -> Self {
        Self::NotAPdf { path: path.into() }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidPreferences error.
    pub fn invalid_preferences(message: impl Into<String>) -> Self {
        Self::InvalidPreferences {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Map an I/O error raised while touching the destination file.
    ///
    /// `PermissionDenied` is how a locked file surfaces on every platform we
    /// target, so it becomes [`PdfCombineError::FileInUse`].
    pub fn from_output_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Self::file_in_use(path)
        } else {
            Self::Io(err)
        }
    }

    /// Check if this error is one the user can fix and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::FileNotFound { .. } | Self::FileInUse { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAPdf { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::PageOutOfRange { .. } => 3,
            Self::Pdf(_) => 3,
            Self::FileInUse { .. } => 4,
            Self::Io(_) => 5,
            Self::NoFilesToMerge => 1,
            Self::InvalidListFile { .. } => 1,
            Self::InvalidPreferences { .. } => 1,
            Self::Json(_) => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Other { .. } => 1,
        }
    }
}

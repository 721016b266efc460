//! pdfcombine - Reorder PDF files, pick page subsets, and combine them into
//! a single document.
//!
//! This library provides everything behind an interactive PDF combiner:
//!
//! - An ordered file list with selection and eight move behaviours
//! - Page-range parsing, validation and normalization
//! - Saved file lists and persisted preferences
//! - A merge workflow with duplicate checks, output selection and progress
//!
//! The user interface is abstracted behind [`prompt::Prompter`], so the same
//! workflow runs in a terminal, a window or a test.
//!
//! # Examples
//!
//! ## Page ranges
//!
//! ```
//! use pdfcombine::selection::parse_and_normalize;
//!
//! let parsed = parse_and_normalize("3-9, 1", 5).unwrap();
//! assert_eq!(parsed.normalized, "3-5,1");
//! assert_eq!(parsed.pages, vec![3, 4, 5, 1]);
//! ```
//!
//! ## Merging a folder
//!
//! ```no_run
//! use pdfcombine::config::Preferences;
//! use pdfcombine::merge::MergeOutcome;
//! use pdfcombine::prompt::FixedAnswer;
//! use pdfcombine::session::Session;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> pdfcombine::Result<()> {
//! let mut session = Session::new(Preferences::default(), Arc::new(FixedAnswer(true)));
//! session.add_directory(Path::new("chapters"))?;
//! if let MergeOutcome::Completed(report) = session.merge().await? {
//!     println!("Wrote {}", report.output.display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod prompt;
pub mod selection;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::{CombineNonSequential, Preferences};
pub use error::{PdfCombineError, Result};
pub use list::{FileEntry, FileListModel, MoveDirection};
pub use merge::{MergeOutcome, MergeReport};
pub use selection::{PageSelection, PageSelectionStore};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

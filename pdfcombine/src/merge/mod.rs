//! PDF merging operations.
//!
//! This module provides:
//! - The [`PdfBackend`] seam and its `lopdf` implementation
//! - The [`MergeOrchestrator`] state machine that drives a merge
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::list::{FileEntry, FileListModel};
//! use pdfcombine::merge::{LopdfBackend, MergeOptions, MergeOrchestrator, MergeOutcome};
//! use pdfcombine::prompt::FixedAnswer;
//! use pdfcombine::selection::PageSelectionStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> pdfcombine::Result<()> {
//! let mut list = FileListModel::new();
//! list.push(FileEntry::new("a.pdf"));
//! list.push(FileEntry::new("b.pdf"));
//!
//! let mut orchestrator = MergeOrchestrator::new(Arc::new(FixedAnswer(true)), MergeOptions::default());
//! let outcome = orchestrator
//!     .run(&mut list, &PageSelectionStore::new(), Box::new(LopdfBackend::new()))
//!     .await?;
//! if let MergeOutcome::Completed(report) = outcome {
//!     println!("Merged {} pages", report.pages_appended);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod orchestrator;

pub use backend::{LETTER_SIZE, LopdfBackend, PdfBackend};
pub use orchestrator::{
    BLANK_PAGE_ESTIMATE, MergeOptions, MergeOrchestrator, MergeOutcome, MergeReport, MergeState,
};

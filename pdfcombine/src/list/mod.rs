//! The ordered list of files to merge.
//!
//! [`FileListModel`] owns the entries and the selection; [`moves`] holds the
//! pure reordering functions behind [`FileListModel::move_selected`].
//!
//! # Examples
//!
//! ```
//! use pdfcombine::config::CombineNonSequential;
//! use pdfcombine::list::{FileEntry, FileListModel, MoveDirection};
//! use pdfcombine::prompt::FixedAnswer;
//!
//! let mut list = FileListModel::new();
//! for path in ["a.pdf", "b.pdf", "c.pdf", "d.pdf", "e.pdf"] {
//!     list.push(FileEntry::new(path));
//! }
//! list.select(0);
//! list.select(1);
//! list.select(4);
//! list.move_selected(MoveDirection::Top, CombineNonSequential::Always, &FixedAnswer(true));
//!
//! let names: Vec<_> = list.entries().iter().map(|e| e.display_name.as_str()).collect();
//! assert_eq!(names, ["a.pdf", "b.pdf", "e.pdf", "c.pdf", "d.pdf"]);
//! ```

pub mod model;
pub mod moves;

pub use model::{DuplicateGroup, FileEntry, FileListModel, ListSnapshot};
pub use moves::MoveDirection;

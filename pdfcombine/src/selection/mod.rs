//! Per-file page selection.
//!
//! A page selection is typed by the user as a range string such as
//! `"1-3,7,10-12"`. Two passes turn it into pages:
//!
//! - [`range::parse_and_normalize`] is the strict pass run when the user
//!   applies a selection. It rejects malformed input, clamps values to the
//!   document and reports what it corrected through [`RangeWarning`].
//! - [`PageSelectionStore::finalize`] is the lenient pass run at merge time.
//!   It never fails and applies the per-file resort/dedup flags.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::selection::{parse_and_normalize, PageSelection, PageSelectionStore};
//!
//! let parsed = parse_and_normalize("0-3, 7", 5).unwrap();
//! assert_eq!(parsed.normalized, "1-3,5");
//! assert_eq!(parsed.pages, vec![1, 2, 3, 5]);
//!
//! let mut store = PageSelectionStore::new();
//! store.set("a.pdf", PageSelection::new("3,1,1", true, true));
//! let pages = store.finalize(|_| Some(5));
//! assert_eq!(pages["a.pdf"], vec![1, 3]);
//! ```

pub mod range;
pub mod store;

pub use range::{ParsedRange, RangeWarning, expand_lenient, parse_and_normalize, sanitize_range_input};
pub use store::{PageSelection, PageSelectionStore, finalize_pages};

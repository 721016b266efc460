//! File input and output.
//!
//! - [`list_file`]: saving and loading file lists with their page selections
//! - [`writer`]: output path handling and in-use retries

pub mod list_file;
pub mod writer;

pub use list_file::{ListFileEntry, read_list_file, write_list_file};
pub use writer::{ensure_pdf_extension, remove_existing, retry_while_in_use};

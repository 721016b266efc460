//! Output file handling.
//!
//! The merged document always goes to a `.pdf` path. A file already at the
//! destination is deleted before writing; when another program holds it
//! open the user is told and asked to retry.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::io::writer::{ensure_pdf_extension, remove_existing};
//! use pdfcombine::prompt::FixedAnswer;
//! use std::path::Path;
//!
//! # fn example() -> pdfcombine::Result<()> {
//! let output = ensure_pdf_extension(Path::new("merged"));
//! assert_eq!(output, Path::new("merged.pdf"));
//!
//! if !remove_existing(&output, &FixedAnswer(true))? {
//!     println!("user kept the existing file");
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PdfCombineError, Result};
use crate::prompt::Confirmer;

/// `path` with a `.pdf` extension, unless it already has one.
pub fn ensure_pdf_extension(path: &Path) -> PathBuf {
    if has_pdf_extension(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

/// Whether `path` ends in `.pdf` (case-insensitive).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Delete the file at `path` if there is one.
///
/// While the file is locked by another program, `confirmer` is asked whether
/// to try again.
///
/// # Returns
///
/// `true` once the path is free, `false` if the user gave up.
///
/// # Errors
///
/// Returns an error for I/O failures other than the file being in use.
pub fn remove_existing<C>(path: &Path, confirmer: &C) -> Result<bool>
where
    C: Confirmer + ?Sized,
{
    loop {
        match fs::remove_file(path) {
            Ok(()) => {
                log::debug!("Removed existing output {}", path.display());
                return Ok(true);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
            Err(err) => match PdfCombineError::from_output_io(path, err) {
                PdfCombineError::FileInUse { .. } => {
                    log::warn!("{} is in use", path.display());
                    let retry = confirmer.confirm(
                        "File In Use",
                        &format!(
                            "{} is open in another program.\n\
                             Close it and choose Yes to try again, or No to pick another file.",
                            path.display()
                        ),
                    );
                    if !retry {
                        return Ok(false);
                    }
                }
                other => return Err(other),
            },
        }
    }
}

/// Run `write` until it stops failing with [`PdfCombineError::FileInUse`],
/// asking the user before each retry.
///
/// There is no retry limit while the user keeps answering yes.
///
/// # Errors
///
/// Returns the [`PdfCombineError::FileInUse`] error once the user declines
/// to retry, and any other error from `write` as is.
pub fn retry_while_in_use<C, T, F>(path: &Path, confirmer: &C, mut write: F) -> Result<T>
where
    C: Confirmer + ?Sized,
    F: FnMut() -> Result<T>,
{
    loop {
        match write() {
            Err(err @ PdfCombineError::FileInUse { .. }) => {
                log::warn!("{} is in use, waiting for the user", path.display());
                let retry = confirmer.confirm(
                    "File In Use",
                    &format!(
                        "{} is open in another program or cannot be written.\n\
                         Close it and choose Yes to try again, or No to give up.",
                        path.display()
                    ),
                );
                if !retry {
                    return Err(err);
                }
            }
            result => return result,
        }
    }
}

/// Size of the file at `path` in bytes, or zero when it cannot be read.
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

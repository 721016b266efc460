//! Saved file lists.
//!
//! A list file is UTF-8 text with one entry per line:
//!
//! ```text
//! /docs/cover.pdf
//! /docs/report.pdf	1-3,7	True	False
//! ```
//!
//! The optional tab-separated fields are the page range, the resort flag and
//! the remove-duplicates flag. Flags are written as `True`/`False`; anything
//! other than `True` reads as false. Blank lines are ignored and `\` in paths
//! becomes `/`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PdfCombineError, Result};
use crate::list::FileEntry;
use crate::selection::{PageSelection, PageSelectionStore};

/// Extension given to saved lists.
pub const LIST_FILE_EXTENSION: &str = "txt";

/// One line of a list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFileEntry {
    /// The file.
    pub entry: FileEntry,
    /// Its page selection, when the line carried one.
    pub selection: Option<PageSelection>,
}

/// Parse list file contents. `source` is only used in error messages.
///
/// # Errors
///
/// Returns [`PdfCombineError::InvalidListFile`] for a line with fields but no
/// path.
pub fn parse_list(source: &Path, text: &str) -> Result<Vec<ListFileEntry>> {
    let mut entries = Vec::new();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let path = fields.next().unwrap_or_default().trim().replace('\\', "/");
        if path.is_empty() {
            return Err(PdfCombineError::InvalidListFile {
                path: source.to_path_buf(),
                line_number: number + 1,
                details: "line has page selection fields but no file path".to_string(),
            });
        }

        let selection = fields.next().map(|range| {
            let resort = fields.next().is_none_or(is_true);
            let remove_duplicates = fields.next().is_none_or(is_true);
            PageSelection::new(range.trim(), resort, remove_duplicates)
        });

        entries.push(ListFileEntry {
            entry: FileEntry::new(path),
            selection,
        });
    }

    Ok(entries)
}

fn is_true(field: &str) -> bool {
    field.trim() == "True"
}

fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Render entries as list file contents.
///
/// Entries with a stored selection get the three extra fields.
pub fn format_list(entries: &[FileEntry], selections: &PageSelectionStore) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.full_path);
        if let Some(selection) = selections.get(&entry.full_path) {
            let _ = write!(
                out,
                "\t{}\t{}\t{}",
                selection.range,
                flag(selection.resort),
                flag(selection.remove_duplicates)
            );
        }
        out.push('\n');
    }
    out
}

/// Read a list file.
///
/// # Errors
///
/// Returns [`PdfCombineError::FileNotFound`] if the file does not exist,
/// [`PdfCombineError::InvalidListFile`] for a malformed line, or an I/O error
/// if it cannot be read.
pub fn read_list_file(path: &Path) -> Result<Vec<ListFileEntry>> {
    if !path.exists() {
        return Err(PdfCombineError::file_not_found(path));
    }
    let text = fs::read_to_string(path)?;
    let entries = parse_list(path, &text)?;
    log::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Write a list file, adding the `.txt` extension when it is missing.
///
/// Returns the path actually written.
pub fn write_list_file(
    path: &Path,
    entries: &[FileEntry],
    selections: &PageSelectionStore,
) -> Result<PathBuf> {
    let path = with_list_extension(path);
    fs::write(&path, format_list(entries, selections))
        .map_err(|err| PdfCombineError::from_output_io(&path, err))?;
    log::debug!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(path)
}

/// `path` with a `.txt` extension, unless it already has one.
pub fn with_list_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LIST_FILE_EXTENSION));
    if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(LIST_FILE_EXTENSION);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bare_and_full_lines() {
        let text = "C:\\docs\\a.pdf\n\n/docs/b.pdf\t2-4,1\tFalse\tTrue\n   \n";
        let entries = parse_list(Path::new("list.txt"), text).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry.full_path, "C:/docs/a.pdf");
        assert_eq!(entries[0].entry.display_name, "a.pdf");
        assert_eq!(entries[0].selection, None);

        assert_eq!(
            entries[1].selection,
            Some(PageSelection::new("2-4,1", false, true))
        );
    }

    #[test]
    fn test_unknown_flag_text_reads_false() {
        let entries = parse_list(Path::new("list.txt"), "a.pdf\t1\ttrue\tyes\n").unwrap();
        let selection = entries[0].selection.as_ref().unwrap();
        assert!(!selection.resort);
        assert!(!selection.remove_duplicates);
    }

    #[test]
    fn test_missing_flags_default_true() {
        let entries = parse_list(Path::new("list.txt"), "a.pdf\t1-2\n").unwrap();
        assert_eq!(
            entries[0].selection,
            Some(PageSelection::new("1-2", true, true))
        );
    }

    #[test]
    fn test_format_only_writes_stored_selections() {
        let entries = vec![FileEntry::new("a.pdf"), FileEntry::new("b.pdf")];
        let mut store = PageSelectionStore::new();
        store.set("b.pdf", PageSelection::new("3", true, false));

        assert_eq!(format_list(&entries, &store), "a.pdf\nb.pdf\t3\tTrue\tFalse\n");
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let entries = vec![
            FileEntry::new("/x/one.pdf"),
            FileEntry::new("/x/two.pdf"),
            FileEntry::new("/x/one.pdf"),
        ];
        let mut store = PageSelectionStore::new();
        store.set("/x/two.pdf", PageSelection::new("5-1", false, false));

        let written = write_list_file(&dir.path().join("saved"), &entries, &store).unwrap();
        assert_eq!(written, dir.path().join("saved.txt"));

        let loaded = read_list_file(&written).unwrap();
        let paths: Vec<_> = loaded.iter().map(|l| l.entry.clone()).collect();
        assert_eq!(paths, entries);
        assert_eq!(
            loaded[1].selection,
            Some(PageSelection::new("5-1", false, false))
        );
        assert_eq!(loaded[2].selection, None);
    }

    #[test]
    fn test_line_without_path_is_rejected() {
        let err = parse_list(Path::new("list.txt"), "a.pdf\n\t1-2\tTrue\tTrue\n").unwrap_err();
        assert!(matches!(
            err,
            PdfCombineError::InvalidListFile { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_list_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, PdfCombineError::FileNotFound { .. }));
    }

    #[test]
    fn test_with_list_extension() {
        assert_eq!(with_list_extension(Path::new("a.txt")), PathBuf::from("a.txt"));
        assert_eq!(with_list_extension(Path::new("a.TXT")), PathBuf::from("a.TXT"));
        assert_eq!(with_list_extension(Path::new("a")), PathBuf::from("a.txt"));
        assert_eq!(with_list_extension(Path::new("a.pdf")), PathBuf::from("a.pdf.txt"));
    }
}

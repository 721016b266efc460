//! The interactive owner of a merge job.
//!
//! A [`Session`] holds the file list, the page selections and the
//! preferences, and is the only thing that mutates them. Front-ends forward
//! user actions to it; it asks its [`Prompter`] whenever a decision is
//! needed.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::config::Preferences;
//! use pdfcombine::list::MoveDirection;
//! use pdfcombine::prompt::FixedAnswer;
//! use pdfcombine::session::Session;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> pdfcombine::Result<()> {
//! let mut session = Session::new(Preferences::default(), Arc::new(FixedAnswer(true)));
//! session.add_directory(Path::new("scans"))?;
//! session.set_page_selection(0, "1-3", true, true)?;
//! session.toggle(2);
//! session.move_selected(MoveDirection::Top);
//! session.merge().await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Preferences;
use crate::error::{PdfCombineError, Result};
use crate::io::list_file::{read_list_file, write_list_file};
use crate::io::writer::{ensure_pdf_extension, has_pdf_extension};
use crate::list::{FileEntry, FileListModel, MoveDirection};
use crate::merge::{LopdfBackend, MergeOptions, MergeOrchestrator, MergeOutcome, PdfBackend};
use crate::output::progress::{NullProgress, ProgressSink};
use crate::prompt::{FileFilter, Prompter};
use crate::selection::{PageSelection, PageSelectionStore, ParsedRange, parse_and_normalize};
use crate::utils::{find_pdfs_in_dir, normalize_path_string};

/// Builds a fresh backend for each merge or page count.
pub type BackendFactory = Box<dyn Fn(&Preferences) -> Box<dyn PdfBackend> + Send + Sync>;

fn lopdf_backend(preferences: &Preferences) -> Box<dyn PdfBackend> {
    Box::new(LopdfBackend::new().with_compression(preferences.compress_output))
}

/// File list, page selections and preferences, plus the operations on them.
pub struct Session {
    list: FileListModel,
    selections: PageSelectionStore,
    preferences: Preferences,
    prompter: Arc<dyn Prompter>,
    progress: Arc<dyn ProgressSink>,
    backend_factory: BackendFactory,
}

impl Session {
    /// Create an empty session backed by `lopdf`.
    pub fn new(preferences: Preferences, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            list: FileListModel::new(),
            selections: PageSelectionStore::new(),
            preferences,
            prompter,
            progress: Arc::new(NullProgress),
            backend_factory: Box::new(lopdf_backend),
        }
    }

    /// Use another PDF backend.
    pub fn with_backend_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Preferences) -> Box<dyn PdfBackend> + Send + Sync + 'static,
    {
        self.backend_factory = Box::new(factory);
        self
    }

    /// Report merge progress to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// The file list.
    pub fn list(&self) -> &FileListModel {
        &self.list
    }

    /// The page selections, keyed by full path.
    pub fn selections(&self) -> &PageSelectionStore {
        &self.selections
    }

    /// Current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Mutable access to the preferences.
    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// Add a path typed by the user.
    ///
    /// `\` separators become `/` and `.pdf` is appended when missing.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FileNotFound`] if nothing exists there.
    pub fn add_path(&mut self, input: &str) -> Result<FileEntry> {
        let path = ensure_pdf_extension(Path::new(&input.trim().replace('\\', "/")));
        if !path.exists() {
            return Err(PdfCombineError::file_not_found(path));
        }
        let entry = FileEntry::new(normalize_path_string(&path));
        log::debug!("Added {}", entry.full_path);
        self.list.push(entry.clone());
        Ok(entry)
    }

    /// Add picked files, skipping anything that is not a PDF.
    ///
    /// Skipped files are reported through the prompter. Returns how many
    /// files were added.
    pub fn add_paths<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let (pdfs, skipped): (Vec<PathBuf>, Vec<PathBuf>) =
            paths.into_iter().partition(|p| has_pdf_extension(p));

        if !skipped.is_empty() {
            let names: Vec<String> = skipped
                .iter()
                .map(|p| FileEntry::new(normalize_path_string(p)).display_name)
                .collect();
            log::warn!("Skipped {} non-PDF file(s)", skipped.len());
            self.prompter.notify(
                "Skipped Files",
                &format!(
                    "The following files are not PDF files and were not added:\n{}",
                    names.join("\n")
                ),
            );
        }

        let added = pdfs.len();
        self.list.extend(
            pdfs.iter()
                .map(|p| FileEntry::new(normalize_path_string(p))),
        );
        added
    }

    /// Add every PDF directly inside `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FileNotFound`] if `dir` is not a directory.
    pub fn add_directory(&mut self, dir: &Path) -> Result<usize> {
        let pdfs = find_pdfs_in_dir(dir)?;
        log::info!("Found {} PDF(s) in {}", pdfs.len(), dir.display());
        Ok(self.add_paths(pdfs))
    }

    /// Ask the user for a file and add it. Returns how many files were added.
    pub fn add_via_dialog(&mut self) -> usize {
        match self.prompter.pick_file(FileFilter::Pdf) {
            Some(path) => self.add_paths([path]),
            None => 0,
        }
    }

    /// Ask the user for a folder and add its PDFs.
    pub fn add_directory_via_dialog(&mut self) -> Result<usize> {
        match self.prompter.pick_directory() {
            Some(dir) => self.add_directory(&dir),
            None => Ok(0),
        }
    }

    /// Append the entries of a saved list, with their page selections.
    ///
    /// For a file that no longer exists the user may pick a replacement,
    /// which takes over the saved selection; otherwise the entry is dropped.
    /// Returns how many entries were added.
    pub fn load_list(&mut self, path: &Path) -> Result<usize> {
        let mut loaded = 0;

        for item in read_list_file(path)? {
            let entry = if item.entry.path().exists() {
                item.entry
            } else {
                let replace = self.prompter.confirm(
                    "File Not Found",
                    &format!(
                        "The file \"{}\" was not found.\nDo you want to replace it with another?",
                        item.entry.display_name
                    ),
                );
                match replace.then(|| self.prompter.pick_file(FileFilter::Pdf)).flatten() {
                    Some(replacement) => FileEntry::new(normalize_path_string(&replacement)),
                    None => {
                        log::warn!("Dropped missing file {}", item.entry.full_path);
                        continue;
                    }
                }
            };

            if let Some(selection) = item.selection {
                self.selections.set(entry.full_path.clone(), selection);
            }
            self.list.push(entry);
            loaded += 1;
        }

        log::info!("Loaded {loaded} file(s) from {}", path.display());
        Ok(loaded)
    }

    /// Save the list and its page selections. Returns the path written,
    /// which always ends in `.txt`.
    pub fn save_list(&self, path: &Path) -> Result<PathBuf> {
        write_list_file(path, self.list.entries(), &self.selections)
    }

    /// Remove the selected entries after confirmation.
    ///
    /// Page selections of removed paths are reset. Returns how many entries
    /// were removed.
    pub fn remove_selected(&mut self) -> usize {
        if self.list.selected_indices().is_empty() {
            return 0;
        }
        let confirmed = self.prompter.confirm(
            "Confirm Deletion",
            "Are you sure you want to delete the selected files from the list?",
        );
        if !confirmed {
            return 0;
        }

        let removed = self.list.remove_selected();
        for entry in &removed {
            self.selections.remove(&entry.full_path);
        }
        removed.len()
    }

    /// Empty the list and forget every page selection, after confirmation.
    ///
    /// Returns whether anything was removed.
    pub fn remove_all(&mut self) -> bool {
        if self.list.is_empty() {
            return false;
        }
        let confirmed = self.prompter.confirm(
            "Confirm Deletion",
            "Are you sure you want to delete all files from the list?",
        );
        if confirmed {
            self.list.clear();
            self.selections.clear();
        }
        confirmed
    }

    /// Flip the selection of the entry at `index`.
    pub fn toggle(&mut self, index: usize) -> bool {
        self.list.toggle(index)
    }

    /// Select `indices`, ignoring any out of range.
    pub fn select(&mut self, indices: &[usize]) {
        for &index in indices {
            self.list.select(index);
        }
    }

    /// Select everything, or clear the selection if everything already is.
    pub fn toggle_all(&mut self) {
        if self.list.is_all_selected() {
            self.list.clear_selection();
        } else {
            self.list.select_all();
        }
    }

    /// Move the selected entries, using the combine preference for gapped
    /// selections.
    pub fn move_selected(&mut self, direction: MoveDirection) -> bool {
        self.list.move_selected(
            direction,
            self.preferences.combine_non_sequential,
            &*self.prompter,
        )
    }

    /// Number of pages in the entry at `index`.
    pub fn page_count(&self, index: usize) -> Result<usize> {
        let entry = self.entry(index)?;
        (self.backend_factory)(&self.preferences).page_count(entry.path())
    }

    /// The page selection of the entry at `index`, or the default.
    pub fn page_selection(&self, index: usize) -> Result<PageSelection> {
        let entry = self.entry(index)?;
        Ok(self.selections.get_or_default(&entry.full_path))
    }

    /// Validate and store a page range for the entry at `index`.
    ///
    /// Warnings are shown to the user and the normalized range is stored.
    ///
    /// # Errors
    ///
    /// A malformed range, or one that leaves no pages (such as `2-2` on a
    /// longer document), is shown to the user and returned; the previous
    /// selection is kept.
    pub fn set_page_selection(
        &mut self,
        index: usize,
        range: &str,
        resort: bool,
        remove_duplicates: bool,
    ) -> Result<ParsedRange> {
        let max_page = self.page_count(index)?;
        let full_path = self.entry(index)?.full_path.clone();

        let parsed = parse_and_normalize(range, max_page).and_then(|parsed| {
            if parsed.selects_nothing() {
                Err(PdfCombineError::invalid_input(
                    range,
                    "no pages are left once single-page spans inside the document are dropped",
                ))
            } else {
                Ok(parsed)
            }
        });
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                self.prompter.notify("Invalid Page Range", &err.to_string());
                return Err(err);
            }
        };
        for warning in &parsed.warnings {
            self.prompter.notify("Page Selection", &warning.to_string());
        }

        log::debug!("{full_path}: pages {}", parsed.normalized);
        self.selections.set(
            full_path,
            PageSelection::new(parsed.normalized.clone(), resort, remove_duplicates),
        );
        Ok(parsed)
    }

    /// Run a merge of the current list.
    pub async fn merge(&mut self) -> Result<MergeOutcome> {
        let backend = (self.backend_factory)(&self.preferences);
        let mut orchestrator = MergeOrchestrator::new(
            Arc::clone(&self.prompter),
            MergeOptions::from_preferences(&self.preferences),
        )
        .with_progress(Arc::clone(&self.progress));

        orchestrator
            .run(&mut self.list, &self.selections, backend)
            .await
    }

    fn entry(&self, index: usize) -> Result<&FileEntry> {
        self.list.get(index).ok_or_else(|| {
            PdfCombineError::invalid_input(
                (index + 1).to_string(),
                format!("the list has {} file(s)", self.list.len()),
            )
        })
    }
}

//! The merge workflow.
//!
//! A merge walks through a fixed sequence of states:
//!
//! ```text
//! Idle -> DuplicateCheck -> Confirming -> SelectingOutput -> Merging -> Writing -> Done
//!                               |
//!                               +-> Aborted
//! ```
//!
//! Questions go to the [`Prompter`]; the PDF work goes to a [`PdfBackend`]
//! on a blocking worker thread, fed from a snapshot of the list taken when
//! merging starts. While the output is written a sampler reports its size to
//! a [`ProgressSink`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Preferences;
use crate::error::{PdfCombineError, Result};
use crate::io::writer::{ensure_pdf_extension, file_size, remove_existing, retry_while_in_use};
use crate::list::{FileEntry, FileListModel};
use crate::merge::backend::{LETTER_SIZE, PdfBackend};
use crate::output::progress::{NullProgress, ProgressSink, SAMPLE_INTERVAL, spawn_sampler};
use crate::prompt::{FileFilter, Prompter};
use crate::selection::PageSelectionStore;
use crate::utils::normalize_path_string;

/// Bytes added to the size estimate for each blank page.
pub const BLANK_PAGE_ESTIMATE: u64 = 1_000;

/// Where a merge currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// Not merging.
    Idle,
    /// Looking for files listed more than once.
    DuplicateCheck,
    /// Waiting for the user to confirm duplicate removal.
    Confirming,
    /// Asking for the output path.
    SelectingOutput,
    /// Appending pages.
    Merging,
    /// Writing the output file.
    Writing,
    /// Output written.
    Done,
    /// The user backed out of duplicate removal; the list was restored.
    Aborted,
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DuplicateCheck => "checking for duplicates",
            Self::Confirming => "confirming",
            Self::SelectingOutput => "selecting output",
            Self::Merging => "merging",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Summary of a finished merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// Where the merged document was written.
    pub output: PathBuf,
    /// Files that contributed pages.
    pub files_merged: usize,
    /// Files that were missing and not replaced.
    pub files_skipped: usize,
    /// Pages taken from input files.
    pub pages_appended: usize,
    /// Blank separator pages added.
    pub blank_pages: usize,
    /// Size the output was expected to have, used for progress.
    pub estimated_size: u64,
    /// Size of the written file.
    pub actual_size: u64,
    /// Wall time from the start of merging to the end of writing.
    pub elapsed: Duration,
}

/// How a merge ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The output was written.
    Completed(MergeReport),
    /// The user declined duplicate removal; nothing was merged.
    Aborted,
    /// No output path was chosen.
    Cancelled,
}

/// Settings for one merge.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Insert a blank page after every file.
    pub add_blank_pages: bool,
    /// Size of the blank pages in points.
    pub blank_page_size: (f32, f32),
    /// How often the progress sampler polls the output.
    pub sample_interval: Duration,
}

impl MergeOptions {
    /// Options taken from the user's preferences.
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            add_blank_pages: preferences.add_blank_page_between_files,
            ..Self::default()
        }
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            add_blank_pages: true,
            blank_page_size: LETTER_SIZE,
            sample_interval: SAMPLE_INTERVAL,
        }
    }
}

/// Counters collected while appending.
#[derive(Debug, Default)]
struct Tally {
    files_merged: usize,
    files_skipped: usize,
    pages_appended: usize,
    blank_pages: usize,
    estimated_size: u64,
}

/// Drives a merge from duplicate check to written file.
pub struct MergeOrchestrator {
    prompter: Arc<dyn Prompter>,
    progress: Arc<dyn ProgressSink>,
    options: MergeOptions,
    state: MergeState,
}

impl MergeOrchestrator {
    /// Create an orchestrator that asks `prompter` for every decision.
    pub fn new(prompter: Arc<dyn Prompter>, options: MergeOptions) -> Self {
        Self {
            prompter,
            progress: Arc::new(NullProgress),
            options,
            state: MergeState::Idle,
        }
    }

    /// Report write progress to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// State reached by the last (or current) run.
    pub fn state(&self) -> MergeState {
        self.state
    }

    fn enter(&mut self, state: MergeState) {
        log::debug!("Merge: {} -> {}", self.state, state);
        self.state = state;
    }

    /// Merge the files in `list` into one PDF.
    ///
    /// Duplicate removal edits `list` in place. Page selections are looked
    /// up in `selections` by path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::NoFilesToMerge`] for an empty list or when
    /// every file was skipped, and propagates load and write failures. The
    /// state is back at [`MergeState::Idle`] after an error.
    pub async fn run(
        &mut self,
        list: &mut FileListModel,
        selections: &PageSelectionStore,
        backend: Box<dyn PdfBackend>,
    ) -> Result<MergeOutcome> {
        if list.is_empty() {
            return Err(PdfCombineError::NoFilesToMerge);
        }
        self.state = MergeState::Idle;

        let result = self.run_inner(list, selections, backend).await;
        if result.is_err() {
            self.enter(MergeState::Idle);
        }
        result
    }

    async fn run_inner(
        &mut self,
        list: &mut FileListModel,
        selections: &PageSelectionStore,
        backend: Box<dyn PdfBackend>,
    ) -> Result<MergeOutcome> {
        if !self.check_duplicates(list) {
            return Ok(MergeOutcome::Aborted);
        }

        let Some(output) = self.select_output()? else {
            log::info!("Merge cancelled: no output selected");
            self.enter(MergeState::Idle);
            return Ok(MergeOutcome::Cancelled);
        };

        self.enter(MergeState::Merging);
        let start = Instant::now();
        let entries = list.entries().to_vec();
        let (backend, tally) = self
            .append_all(entries, selections.clone(), backend)
            .await?;

        if tally.files_merged == 0 {
            return Err(PdfCombineError::NoFilesToMerge);
        }

        self.enter(MergeState::Writing);
        self.write_output(backend, &output, tally.estimated_size)
            .await?;

        let report = MergeReport {
            actual_size: file_size(&output),
            output,
            files_merged: tally.files_merged,
            files_skipped: tally.files_skipped,
            pages_appended: tally.pages_appended,
            blank_pages: tally.blank_pages,
            estimated_size: tally.estimated_size,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Merged {} file(s) into {} in {:.2}s",
            report.files_merged,
            report.output.display(),
            report.elapsed.as_secs_f64()
        );
        self.enter(MergeState::Done);
        Ok(MergeOutcome::Completed(report))
    }

    /// Offer to remove duplicates. Returns `false` when the user aborted, in
    /// which case `list` has been restored.
    fn check_duplicates(&mut self, list: &mut FileListModel) -> bool {
        self.enter(MergeState::DuplicateCheck);
        let snapshot = list.snapshot();

        for group in list.duplicate_groups() {
            let remove = self.prompter.confirm(
                "Duplicate Files",
                &format!(
                    "{} is in the list {} times.\nDo you want to remove the duplicates?",
                    group.full_path,
                    group.indices.len()
                ),
            );
            if !remove {
                continue;
            }

            self.enter(MergeState::Confirming);
            let confirmed = self.prompter.confirm(
                "Confirm Removal",
                &format!(
                    "Only the first occurrence of {} will be kept.\nContinue?",
                    group.full_path
                ),
            );
            if !confirmed {
                list.restore(snapshot);
                log::info!("Merge aborted during duplicate removal");
                self.enter(MergeState::Aborted);
                return false;
            }

            let removed = list.dedup_keep_first(&group.full_path);
            log::debug!("Removed {removed} duplicate(s) of {}", group.full_path);
            self.enter(MergeState::DuplicateCheck);
        }
        true
    }

    /// Ask for a destination until one is free to write, or the user gives up.
    fn select_output(&mut self) -> Result<Option<PathBuf>> {
        self.enter(MergeState::SelectingOutput);
        loop {
            let Some(picked) = self.prompter.pick_save_path(FileFilter::Pdf) else {
                let retry = self.prompter.confirm(
                    "No Output Selected",
                    "No output file was selected.\nDo you want to choose one?",
                );
                if retry {
                    continue;
                }
                return Ok(None);
            };

            let output = ensure_pdf_extension(&picked);
            if remove_existing(&output, &*self.prompter)? {
                log::debug!("Output: {}", output.display());
                return Ok(Some(output));
            }
        }
    }

    async fn append_all(
        &self,
        entries: Vec<FileEntry>,
        selections: PageSelectionStore,
        mut backend: Box<dyn PdfBackend>,
    ) -> Result<(Box<dyn PdfBackend>, Tally)> {
        let prompter = Arc::clone(&self.prompter);
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || {
            let mut tally = Tally::default();
            for entry in &entries {
                let Some(path) = locate(entry, &*prompter) else {
                    log::warn!("Skipping missing file {}", entry.full_path);
                    tally.files_skipped += 1;
                    continue;
                };
                append_file(&mut *backend, &path, &selections, &mut tally)?;

                if options.add_blank_pages {
                    let (width, height) = options.blank_page_size;
                    backend.append_blank_page(width, height)?;
                    tally.blank_pages += 1;
                    tally.estimated_size += BLANK_PAGE_ESTIMATE;
                }
            }
            Ok((backend, tally))
        })
        .await
        .map_err(|e| PdfCombineError::other(format!("merge worker failed: {e}")))?
    }

    async fn write_output(
        &self,
        mut backend: Box<dyn PdfBackend>,
        output: &Path,
        estimated_size: u64,
    ) -> Result<()> {
        let sampler = spawn_sampler(
            output.to_path_buf(),
            estimated_size,
            self.options.sample_interval,
            Arc::clone(&self.progress),
        );

        let prompter = Arc::clone(&self.prompter);
        let path = output.to_path_buf();
        let written = tokio::task::spawn_blocking(move || {
            retry_while_in_use(&path, &*prompter, || backend.write(&path))
        })
        .await;

        sampler.finish().await;
        written.map_err(|e| PdfCombineError::other(format!("write worker failed: {e}")))?
    }
}

/// The path to read `entry` from, asking for a replacement when it is gone.
fn locate(entry: &FileEntry, prompter: &dyn Prompter) -> Option<PathBuf> {
    let path = entry.path();
    if path.exists() {
        return Some(path.to_path_buf());
    }

    let replace = prompter.confirm(
        "File Not Found",
        &format!(
            "{} could not be found.\nDo you want to locate it? Choose No to skip it.",
            entry.full_path
        ),
    );
    if !replace {
        return None;
    }
    prompter
        .pick_file(FileFilter::Pdf)
        .filter(|replacement| replacement.exists())
}

fn append_file(
    backend: &mut dyn PdfBackend,
    path: &Path,
    selections: &PageSelectionStore,
    tally: &mut Tally,
) -> Result<()> {
    let size = file_size(path);
    let key = normalize_path_string(path);

    let Some(selection) = selections.get(&key) else {
        tally.pages_appended += backend.append_whole(path)?;
        tally.estimated_size += size;
        tally.files_merged += 1;
        return Ok(());
    };

    let total = backend.page_count(path)?;
    let pages = selection.finalize(Some(total));
    if pages.iter().copied().eq(1..=total) {
        tally.pages_appended += backend.append_whole(path)?;
        tally.estimated_size += size;
    } else {
        for &page in &pages {
            backend.append_page(path, page - 1)?;
        }
        tally.pages_appended += pages.len();
        if total > 0 {
            tally.estimated_size += size * pages.len() as u64 / total as u64;
        }
        log::debug!("{}: pages {pages:?} of {total}", path.display());
    }
    tally.files_merged += 1;
    Ok(())
}

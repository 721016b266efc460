//! The ordered file list and its selection.

use std::collections::BTreeSet;
use std::path::Path;

use super::moves::{MoveDirection, move_items, resolve_combine};
use crate::config::CombineNonSequential;
use crate::prompt::Confirmer;

/// A file in the merge list.
///
/// Identity is the full path; two entries with the same path are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Path as entered, with `/` separators.
    pub full_path: String,
    /// Final path component, shown to the user.
    pub display_name: String,
}

impl FileEntry {
    /// Create an entry, deriving the display name from the path.
    pub fn new(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let display_name = Path::new(&full_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| full_path.clone());
        Self {
            full_path,
            display_name,
        }
    }

    /// The full path as a [`Path`].
    pub fn path(&self) -> &Path {
        Path::new(&self.full_path)
    }
}

/// Entries sharing one path, with their positions in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared path.
    pub full_path: String,
    /// Ascending positions of every copy.
    pub indices: Vec<usize>,
}

/// Saved list contents, see [`FileListModel::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    entries: Vec<FileEntry>,
}

/// Ordered list of files plus the set of selected positions.
///
/// Order is merge order. Selected indices are always in bounds.
#[derive(Debug, Clone, Default)]
pub struct FileListModel {
    entries: Vec<FileEntry>,
    selected: BTreeSet<usize>,
}

impl FileListModel {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from existing entries, nothing selected.
    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        Self {
            entries,
            selected: BTreeSet::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    /// Whether any entry has this path.
    pub fn contains_path(&self, full_path: &str) -> bool {
        self.entries.iter().any(|e| e.full_path == full_path)
    }

    /// Append an entry.
    pub fn push(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Append several entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = FileEntry>) {
        self.entries.extend(entries);
    }

    /// Remove the selected entries and return them.
    pub fn remove_selected(&mut self) -> Vec<FileEntry> {
        let selected = std::mem::take(&mut self.selected);
        let mut removed = Vec::with_capacity(selected.len());
        let mut index = 0;
        self.entries.retain(|entry| {
            let keep = !selected.contains(&index);
            if !keep {
                removed.push(entry.clone());
            }
            index += 1;
            keep
        });
        removed
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected.clear();
    }

    /// Flip the selection of `index`. Out of range indices are ignored.
    ///
    /// Returns whether the entry is now selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
            true
        } else {
            false
        }
    }

    /// Select `index`. Out of range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected.insert(index);
        }
    }

    /// Deselect `index`.
    pub fn deselect(&mut self, index: usize) {
        self.selected.remove(&index);
    }

    /// Select every entry.
    pub fn select_all(&mut self) {
        self.selected = (0..self.entries.len()).collect();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Whether the list is non-empty and every entry is selected.
    pub fn is_all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected.len() == self.entries.len()
    }

    /// Whether `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected positions, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Move the selected entries and clear the selection.
    ///
    /// `policy` decides whether a non-sequential selection is combined;
    /// [`CombineNonSequential::Ask`] asks `confirmer`. Returns `false` when
    /// nothing was selected.
    pub fn move_selected<C>(
        &mut self,
        direction: MoveDirection,
        policy: CombineNonSequential,
        confirmer: &C,
    ) -> bool
    where
        C: Confirmer + ?Sized,
    {
        let selected = self.selected_indices();
        if selected.is_empty() {
            return false;
        }

        let combine = resolve_combine(&selected, policy, confirmer);
        log::debug!("Moving {selected:?} {direction} (combine: {combine})");

        self.entries = move_items(&self.entries, &selected, direction, combine);
        self.selected.clear();
        true
    }

    /// Groups of entries that share a path, in order of first appearance.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            match groups.iter_mut().find(|g| g.full_path == entry.full_path) {
                Some(group) => group.indices.push(index),
                None => groups.push(DuplicateGroup {
                    full_path: entry.full_path.clone(),
                    indices: vec![index],
                }),
            }
        }
        groups.retain(|g| g.indices.len() > 1);
        groups
    }

    /// Keep only the first entry with `full_path`. Returns how many were
    /// removed. Clears the selection.
    pub fn dedup_keep_first(&mut self, full_path: &str) -> usize {
        let before = self.entries.len();
        let mut seen = false;
        self.entries.retain(|entry| {
            if entry.full_path != full_path {
                return true;
            }
            !std::mem::replace(&mut seen, true)
        });
        self.selected.clear();
        before - self.entries.len()
    }

    /// Replace the path of the entry at `index`.
    pub fn replace(&mut self, index: usize, entry: FileEntry) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    /// Copy of the current entries.
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            entries: self.entries.clone(),
        }
    }

    /// Put back entries saved by [`snapshot`](Self::snapshot). Clears the
    /// selection.
    pub fn restore(&mut self, snapshot: ListSnapshot) {
        self.entries = snapshot.entries;
        self.selected.clear();
    }
}

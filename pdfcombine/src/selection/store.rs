//! Page selections keyed by file path.

use std::collections::HashMap;
use std::collections::hash_map;

use super::range::expand_lenient;

/// Page selection for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    /// Normalized range string. Empty means every page.
    pub range: String,
    /// Sort the finalized pages ascending.
    pub resort: bool,
    /// Keep only the first occurrence of each page.
    pub remove_duplicates: bool,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            range: String::new(),
            resort: true,
            remove_duplicates: true,
        }
    }
}

impl PageSelection {
    /// Create a selection.
    pub fn new(range: impl Into<String>, resort: bool, remove_duplicates: bool) -> Self {
        Self {
            range: range.into(),
            resort,
            remove_duplicates,
        }
    }

    /// Concrete pages for this selection.
    ///
    /// See [`finalize_pages`].
    pub fn finalize(&self, page_count: Option<usize>) -> Vec<usize> {
        finalize_pages(self, page_count)
    }
}

/// Turn a selection into the page list used at merge time.
///
/// Never fails: malformed fragments are skipped. Duplicates are removed
/// before sorting, so with both flags set the result is ascending and unique
/// and finalizing it again yields the same list.
pub fn finalize_pages(selection: &PageSelection, page_count: Option<usize>) -> Vec<usize> {
    let mut pages = expand_lenient(&selection.range, page_count);

    if selection.remove_duplicates {
        let mut seen = std::collections::HashSet::with_capacity(pages.len());
        pages.retain(|page| seen.insert(*page));
    }

    if selection.resort {
        pages.sort_unstable();
    }

    pages
}

/// Page selections keyed by a file's full path.
///
/// Entries are created on first interaction; a path with no entry uses
/// [`PageSelection::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelectionStore {
    entries: HashMap<String, PageSelection>,
}

impl PageSelectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection stored for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&PageSelection> {
        self.entries.get(path)
    }

    /// Selection for `path`, or the default when none is stored.
    pub fn get_or_default(&self, path: &str) -> PageSelection {
        self.entries.get(path).cloned().unwrap_or_default()
    }

    /// Store a selection for `path`, replacing any previous one.
    pub fn set(&mut self, path: impl Into<String>, selection: PageSelection) {
        self.entries.insert(path.into(), selection);
    }

    /// Drop the selection for `path`, reverting it to the default.
    pub fn remove(&mut self, path: &str) -> Option<PageSelection> {
        self.entries.remove(path)
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether `path` has a stored selection.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of stored selections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no selections are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(path, selection)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, PageSelection> {
        self.entries.iter()
    }

    /// Finalize every stored selection.
    ///
    /// `page_count` is asked for each path; returning `None` (unknown page
    /// count) disables bounds filtering for that path.
    pub fn finalize<F>(&self, page_count: F) -> HashMap<String, Vec<usize>>
    where
        F: Fn(&str) -> Option<usize>,
    {
        self.entries
            .iter()
            .map(|(path, selection)| (path.clone(), finalize_pages(selection, page_count(path))))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PageSelectionStore {
    type Item = (&'a String, &'a PageSelection);
    type IntoIter = hash_map::Iter<'a, String, PageSelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_selection() {
        let selection = PageSelection::default();
        assert!(selection.range.is_empty());
        assert!(selection.resort);
        assert!(selection.remove_duplicates);
    }

    #[rstest]
    #[case("3,1,2,1", true, true, vec![1, 2, 3])]
    #[case("3,1,2,1", false, true, vec![3, 1, 2])]
    #[case("3,1,2,1", true, false, vec![1, 1, 2, 3])]
    #[case("3,1,2,1", false, false, vec![3, 1, 2, 1])]
    #[case("5-3,4", false, true, vec![5, 4, 3])]
    #[case("", true, true, vec![1, 2, 3, 4, 5])]
    #[case("2,bad,9,4", true, true, vec![2, 4])]
    fn test_finalize_flags(
        #[case] range: &str,
        #[case] resort: bool,
        #[case] dedup: bool,
        #[case] expected: Vec<usize>,
    ) {
        let selection = PageSelection::new(range, resort, dedup);
        assert_eq!(selection.finalize(Some(5)), expected);
    }

    #[test]
    fn test_selection_outside_document_finalizes_empty() {
        // Unlike an empty range, a range that names only missing pages
        // contributes nothing.
        assert!(PageSelection::new("9-12", true, true).finalize(Some(5)).is_empty());
        assert!(PageSelection::new("0,7", false, false).finalize(Some(5)).is_empty());
        assert_eq!(PageSelection::new("", true, true).finalize(Some(2)), vec![1, 2]);
    }

    #[rstest]
    #[case("7,3,3,1-4,2")]
    #[case("10-1")]
    #[case("1,,1,2-,5")]
    fn test_finalize_is_idempotent(#[case] range: &str) {
        let first = PageSelection::new(range, true, true).finalize(Some(10));
        let joined = first
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let second = PageSelection::new(joined, true, true).finalize(Some(10));
        assert_eq!(first, second);
    }

    #[test]
    fn test_store_operations() {
        let mut store = PageSelectionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_or_default("a.pdf"), PageSelection::default());

        store.set("a.pdf", PageSelection::new("1-2", true, false));
        assert!(store.contains("a.pdf"));
        assert_eq!(store.get("a.pdf").unwrap().range, "1-2");
        assert_eq!(store.len(), 1);

        assert!(store.remove("a.pdf").is_some());
        assert!(!store.contains("a.pdf"));

        store.set("b.pdf", PageSelection::default());
        store.set("c.pdf", PageSelection::default());
        assert_eq!(store.iter().count(), 2);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_finalize_uses_lookup_per_path() {
        let mut store = PageSelectionStore::new();
        store.set("short.pdf", PageSelection::new("", true, true));
        store.set("long.pdf", PageSelection::new("8,2", true, true));
        store.set("missing.pdf", PageSelection::new("3-1", false, true));

        let pages = store.finalize(|path| match path {
            "short.pdf" => Some(2),
            "long.pdf" => Some(10),
            _ => None,
        });

        assert_eq!(pages["short.pdf"], vec![1, 2]);
        assert_eq!(pages["long.pdf"], vec![2, 8]);
        assert_eq!(pages["missing.pdf"], vec![3, 2, 1]);
    }
}

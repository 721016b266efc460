//! Shared helpers for the integration tests.
//!
//! PDFs are generated with `lopdf` at test time; every page carries its
//! 1-based number in a `/Label` entry so tests can check page order.

#![allow(dead_code)]

use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pdfcombine::prompt::{Confirmer, FileFilter, Prompter};

/// Write a PDF with `pages` labelled pages to `dir/name`.
pub fn create_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Label" => n as i64,
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// `/Label` of every page of the PDF at `path`, in order. Blank pages read
/// as 0.
pub fn page_labels(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"Label").ok())
                .and_then(|label| label.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}

/// Answers every question the same way and saves to a fixed path.
pub struct ScriptedPrompter {
    answer: bool,
    output: Mutex<Option<PathBuf>>,
    pub replacement: Option<PathBuf>,
    pub notices: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answer: bool, output: impl Into<PathBuf>) -> Self {
        Self {
            answer,
            output: Mutex::new(Some(output.into())),
            replacement: None,
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn without_output(answer: bool) -> Self {
        let prompter = Self::new(answer, "");
        *prompter.output.lock().unwrap() = None;
        prompter
    }

    pub fn with_replacement(mut self, replacement: impl Into<PathBuf>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

impl Confirmer for ScriptedPrompter {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.answer
    }

    fn notify(&self, title: &str, _message: &str) {
        self.notices.lock().unwrap().push(title.to_string());
    }
}

impl Prompter for ScriptedPrompter {
    fn pick_file(&self, _filter: FileFilter) -> Option<PathBuf> {
        self.replacement.clone()
    }

    /// The output path once, then nothing.
    fn pick_save_path(&self, _filter: FileFilter) -> Option<PathBuf> {
        self.output.lock().unwrap().take()
    }

    fn pick_directory(&self) -> Option<PathBuf> {
        None
    }
}

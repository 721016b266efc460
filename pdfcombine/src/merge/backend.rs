//! The PDF library behind a merge.
//!
//! [`PdfBackend`] is the narrow set of operations the merge needs: count
//! pages, append a whole document or single pages, append blank pages and
//! write the result. [`LopdfBackend`] implements it with `lopdf`.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::merge::backend::{LopdfBackend, PdfBackend, LETTER_SIZE};
//! use std::path::Path;
//!
//! # fn example() -> pdfcombine::Result<()> {
//! let mut backend = LopdfBackend::new();
//! backend.append_whole(Path::new("cover.pdf"))?;
//! backend.append_page(Path::new("report.pdf"), 2)?;
//! backend.append_blank_page(LETTER_SIZE.0, LETTER_SIZE.1)?;
//! backend.write(Path::new("merged.pdf"))?;
//! # Ok(())
//! # }
//! ```

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PdfCombineError, Result};

/// US Letter in points.
pub const LETTER_SIZE: (f32, f32) = (612.0, 792.0);

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Depth limit when walking up a page tree, guarding against cycles.
const MAX_TREE_DEPTH: usize = 64;

/// Operations the merge needs from a PDF library.
///
/// Calls accumulate into one output document, which [`write`](Self::write)
/// saves. Page indices are 0-based.
pub trait PdfBackend: Send {
    /// Number of pages in the document at `path`.
    fn page_count(&mut self, path: &Path) -> Result<usize>;

    /// Append every page of `path`. Returns the number of pages appended.
    fn append_whole(&mut self, path: &Path) -> Result<usize>;

    /// Append page `page_index` (0-based) of `path`.
    fn append_page(&mut self, path: &Path, page_index: usize) -> Result<()>;

    /// Append an empty page of the given size in points.
    fn append_blank_page(&mut self, width: f32, height: f32) -> Result<()>;

    /// Write the accumulated document to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FileInUse`] when the destination is locked.
    fn write(&mut self, output: &Path) -> Result<()>;
}

/// [`PdfBackend`] built on `lopdf`.
///
/// Each source is loaded once and its objects are copied into the output
/// document the first time one of its pages is appended. Appending the same
/// page again adds a copy of the page object that shares its content.
pub struct LopdfBackend {
    output: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    /// Sources loaded for a page count but not yet imported.
    loaded: HashMap<PathBuf, Document>,
    /// Page object ids in the output document, per imported source.
    imported: HashMap<PathBuf, Vec<ObjectId>>,
    placed: HashSet<ObjectId>,
    compress: bool,
}

impl LopdfBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        let mut output = Document::with_version("1.7");
        let pages_id = output.new_object_id();
        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        Self {
            output,
            pages_id,
            kids: Vec::new(),
            loaded: HashMap::new(),
            imported: HashMap::new(),
            placed: HashSet::new(),
            compress: false,
        }
    }

    /// Compress object streams when writing.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Pages appended so far.
    pub fn appended_pages(&self) -> usize {
        self.kids.len()
    }

    fn load(path: &Path) -> Result<Document> {
        if !path.exists() {
            return Err(PdfCombineError::file_not_found(path));
        }
        let doc = Document::load(path).map_err(|e| {
            if has_pdf_header(path) {
                PdfCombineError::failed_to_load_pdf(path, e.to_string())
            } else {
                PdfCombineError::not_a_pdf(path)
            }
        })?;
        log::debug!("Loaded {} ({} pages)", path.display(), doc.get_pages().len());
        Ok(doc)
    }

    /// Output ids of the pages of `path`, importing it on first use.
    fn source_pages(&mut self, path: &Path) -> Result<&[ObjectId]> {
        if !self.imported.contains_key(path) {
            let doc = match self.loaded.remove(path) {
                Some(doc) => doc,
                None => Self::load(path)?,
            };
            let page_ids = self.import(doc);
            self.imported.insert(path.to_path_buf(), page_ids);
        }
        Ok(self
            .imported
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Copy all objects of `doc` into the output and re-parent its pages.
    fn import(&mut self, mut doc: Document) -> Vec<ObjectId> {
        doc.renumber_objects_with(self.output.max_id + 1);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let inherited = inherited_attributes(&doc, page_id);
            if let Ok(page) = doc.get_dictionary_mut(page_id) {
                for (key, value) in inherited {
                    page.set(key, value);
                }
                page.set("Parent", self.pages_id);
            }
        }

        self.output.max_id = self.output.max_id.max(doc.max_id);
        self.output.objects.extend(doc.objects);
        page_ids
    }

    fn place(&mut self, page_id: ObjectId) -> Result<()> {
        let id = if self.placed.insert(page_id) {
            page_id
        } else {
            let copy = self.output.get_object(page_id)?.clone();
            self.output.add_object(copy)
        };
        self.kids.push(id);
        Ok(())
    }

    fn finish_tree(&mut self) -> Result<()> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let pages = self.output.get_dictionary_mut(self.pages_id)?;
        pages.set("Kids", kids);
        pages.set("Count", self.kids.len() as i64);

        if self.output.trailer.get(b"Root").is_err() {
            let catalog_id = self.output.add_object(dictionary! {
                "Type" => "Catalog",
                "Pages" => self.pages_id,
            });
            self.output.trailer.set("Root", catalog_id);
        }
        Ok(())
    }
}

impl Default for LopdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&mut self, path: &Path) -> Result<usize> {
        if let Some(pages) = self.imported.get(path) {
            return Ok(pages.len());
        }
        if let Some(doc) = self.loaded.get(path) {
            return Ok(doc.get_pages().len());
        }
        let doc = Self::load(path)?;
        let count = doc.get_pages().len();
        self.loaded.insert(path.to_path_buf(), doc);
        Ok(count)
    }

    fn append_whole(&mut self, path: &Path) -> Result<usize> {
        let pages = self.source_pages(path)?.to_vec();
        for &page_id in &pages {
            self.place(page_id)?;
        }
        log::debug!("Appended {} pages of {}", pages.len(), path.display());
        Ok(pages.len())
    }

    fn append_page(&mut self, path: &Path, page_index: usize) -> Result<()> {
        let pages = self.source_pages(path)?;
        let page_id = pages
            .get(page_index)
            .copied()
            .ok_or_else(|| PdfCombineError::PageOutOfRange {
                path: path.to_path_buf(),
                page: page_index + 1,
                total_pages: pages.len(),
            })?;
        self.place(page_id)
    }

    fn append_blank_page(&mut self, width: f32, height: f32) -> Result<()> {
        let page_id = self.output.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
            "Resources" => Dictionary::new(),
        });
        self.place(page_id)
    }

    fn write(&mut self, output: &Path) -> Result<()> {
        self.finish_tree()?;

        let mut doc = self.output.clone();
        doc.prune_objects();
        doc.renumber_objects();
        if self.compress {
            doc.compress();
        }

        let file = File::create(output).map_err(|e| PdfCombineError::from_output_io(output, e))?;
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer).map_err(|e| {
            PdfCombineError::other(format!("Failed to write {}: {e}", output.display()))
        })?;
        writer
            .flush()
            .map_err(|e| PdfCombineError::from_output_io(output, e))?;

        log::info!("Wrote {} pages to {}", self.kids.len(), output.display());
        Ok(())
    }
}

/// Attributes `page_id` inherits from its ancestors and does not set itself.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE_KEYS
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        if missing.is_empty() {
            break;
        }
        let Some(node) = parent.and_then(|id| doc.get_dictionary(id).ok()) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}

/// Whether `%PDF-` appears in the first kilobyte of `path`.
fn has_pdf_header(path: &Path) -> bool {
    let mut head = Vec::with_capacity(1024);
    let read = File::open(path).and_then(|file| file.take(1024).read_to_end(&mut head));
    read.is_ok() && head.windows(5).any(|window| window == b"%PDF-")
}

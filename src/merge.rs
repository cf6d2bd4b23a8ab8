//! PDF merge accumulator.
//!
//! [`PdfMerger`] concatenates intermediate PDFs into one document, keeping
//! pages in append order. The merged result is serialized to memory before
//! anything touches the output path, so a failed merge never leaves a
//! partial file that looks valid.

use crate::error::{Error, Result};
use lopdf::{dictionary, Document, Object, ObjectId};
use std::fs;
use std::path::Path;

/// Accumulator holding pages from multiple intermediate PDFs prior to the
/// final write.
///
/// # Example
///
/// ```no_run
/// use tiffmerge::merge::PdfMerger;
///
/// fn main() -> tiffmerge::Result<()> {
///     let mut merger = PdfMerger::new();
///     merger.append("a.pdf")?;
///     merger.append("b.pdf")?;
///     merger.write("merged.pdf")?;
///     Ok(())
/// }
/// ```
pub struct PdfMerger {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfMerger {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.5"),
            page_ids: Vec::new(),
        }
    }

    /// Append every page of the PDF at `path`, in document order.
    pub fn append<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut doc = Document::load(path)
            .map_err(|e| Error::Merge(format!("failed to load {}: {}", path.display(), e)))?;

        // Shift the incoming ids past the accumulator's high-water mark and
        // advance the mark so later allocations cannot collide.
        doc.renumber_objects_with(self.document.max_id + 1);
        self.document.max_id = doc.max_id;

        // Page order within the source document.
        for (_, page_id) in doc.get_pages() {
            self.page_ids.push(page_id);
        }

        // Absorb all objects except the source's own page-tree containers;
        // pages are re-parented under a unified tree at write time.
        for (object_id, object) in doc.objects {
            if is_page_tree_container(&object) {
                continue;
            }
            self.document.objects.insert(object_id, object);
        }

        Ok(())
    }

    /// Number of pages accumulated so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Build the unified document and write it to `path`, consuming the
    /// accumulator.
    pub fn write<P: AsRef<Path>>(mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.page_ids.is_empty() {
            return Err(Error::Merge("no pages to write".into()));
        }

        let pages_id = self.document.new_object_id();
        for &page_id in &self.page_ids {
            let page = self
                .document
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| Error::Merge(format!("page object {:?} is invalid: {}", page_id, e)))?;
            page.set("Parent", pages_id);
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.renumber_objects();

        // Serialize fully in memory first; only a complete document ever
        // reaches the output path.
        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| Error::Merge(format!("failed to serialize merged output: {}", e)))?;
        fs::write(path, buffer)
            .map_err(|e| Error::Merge(format!("failed to write {}: {}", path.display(), e)))?;

        Ok(())
    }
}

impl Default for PdfMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// True for `Pages` and `Catalog` dictionaries, which must not be carried
/// over from appended documents.
fn is_page_tree_container(object: &Object) -> bool {
    object
        .as_dict()
        .ok()
        .and_then(|d| d.get(b"Type").ok())
        .and_then(|t| t.as_name().ok())
        .map(|name| name == b"Pages" || name == b"Catalog")
        .unwrap_or(false)
}

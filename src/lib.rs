//! # tiffmerge
//!
//! Batch conversion of multi-page TIFF scans into a single merged PDF.
//!
//! The library validates each candidate file's binary signature, converts
//! validated TIFFs to intermediate PDFs (one page per frame, in frame
//! order), merges the intermediates in listing order into one dated output
//! file, and cleans up intermediates and source files afterward.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tiffmerge::{run_batch, BatchManifest, BatchOptions};
//! use std::path::Path;
//!
//! fn main() -> tiffmerge::Result<()> {
//!     let manifest = BatchManifest::new("DOE,JOHN", ["scan_001.tif", "scan_002.tif"]);
//!     let options = BatchOptions::new();
//!
//!     let report = run_batch(
//!         Path::new("pdf/input"),
//!         &manifest,
//!         Path::new("pdf/output"),
//!         &options,
//!     )?;
//!     println!("Merged output: {}", report.output_path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Signature validation**: content-based TIFF magic-number check for an
//!   explicitly configured byte order; extension filtering is separate
//! - **Conversion**: every frame normalized to RGB and written as one PDF
//!   page, original frame order preserved exactly
//! - **Merging**: intermediates concatenated in directory-listing order;
//!   the merged page sequence is never reordered or interleaved
//! - **Cleanup**: intermediates removed on every exit path; source removal
//!   is an explicit, named policy

pub mod convert;
pub mod detect;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod pipeline;

// Re-export commonly used types
pub use convert::{convert_to_pdf, decode_frames, derive_pdf_path, write_pdf, PageImage};
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, is_tiff, is_tiff_bytes, ByteOrder,
    TiffFormat,
};
pub use error::{Error, Result};
pub use manifest::BatchManifest;
pub use merge::PdfMerger;
pub use pipeline::{
    discover, output_file_name, run_batch, BatchOptions, BatchReport, DeletePolicy, FailurePolicy,
};

use std::path::{Path, PathBuf};

/// Convert one TIFF file to a PDF next to it.
///
/// Convenience wrapper over [`convert::convert_to_pdf`].
///
/// # Example
///
/// ```no_run
/// use tiffmerge::convert_file;
///
/// let pdf = convert_file("scan.tif").unwrap();
/// println!("wrote {}", pdf.display());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    convert::convert_to_pdf(path)
}

/// Merge existing PDF files, in slice order, into one document at `output`.
///
/// # Example
///
/// ```no_run
/// use tiffmerge::merge_files;
///
/// merge_files(&["a.pdf", "b.pdf"], "merged.pdf").unwrap();
/// ```
pub fn merge_files<P, Q>(paths: &[P], output: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut merger = PdfMerger::new();
    for path in paths {
        merger.append(path)?;
    }
    merger.write(output)
}

//! Single-file TIFF to PDF conversion.
//!
//! The converter opens a TIFF container, flattens all frames into RGB page
//! images in on-disk order, and writes them as one PDF to a path derived
//! from the source path. It never deletes a file it creates — intermediate
//! lifecycle management belongs to the batch pipeline.
//!
//! # Example
//!
//! ```no_run
//! use tiffmerge::convert::convert_to_pdf;
//!
//! fn main() -> tiffmerge::Result<()> {
//!     let pdf = convert_to_pdf("pdf/input/scan_001.tif")?;
//!     println!("wrote {}", pdf.display());
//!     Ok(())
//! }
//! ```

mod pages;
mod pdf;

pub use pages::{decode_frames, PageImage};
pub use pdf::write_pdf;

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Derive the intermediate PDF path from a TIFF source path.
///
/// Swaps a trailing `.tiff` or `.tif` suffix (checked in that priority
/// order, ASCII case-insensitive) for `.pdf`. Pure function of the input:
/// calling it twice yields the same path.
///
/// # Errors
///
/// `Error::InvalidPath` if the path carries neither suffix. The pipeline
/// pre-filters by extension, but the converter must not silently
/// mis-derive an output path.
pub fn derive_pdf_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;

    let lower = name.to_ascii_lowercase();
    let stem_len = if lower.ends_with(".tiff") {
        name.len() - ".tiff".len()
    } else if lower.ends_with(".tif") {
        name.len() - ".tif".len()
    } else {
        return Err(Error::InvalidPath(path.to_path_buf()));
    };

    Ok(path.with_file_name(format!("{}.pdf", &name[..stem_len])))
}

/// Convert one TIFF file to a PDF next to it.
///
/// All frames are decoded in on-disk order, normalized to RGB, and written
/// as sequential pages of a single PDF at the derived path.
///
/// # Returns
///
/// The intermediate PDF path on success.
///
/// # Errors
///
/// * `Error::InvalidPath` - the source has no `.tif`/`.tiff` suffix
/// * `Error::NotFound` - the source does not exist at call time (no lock is
///   held; the check is only satisfiable immediately before use)
/// * `Error::Conversion` - any frame decode or PDF-write failure, tagged
///   with the source path and fatal to the whole file
pub fn convert_to_pdf<P: AsRef<Path>>(source: P) -> Result<PathBuf> {
    let source = source.as_ref();
    let pdf_path = derive_pdf_path(source)?;

    if !source.exists() {
        return Err(Error::NotFound(source.to_path_buf()));
    }

    let frames = decode_frames(source)?;
    write_pdf(&frames, &pdf_path)?;

    log::info!(
        "{} created ({} page{})",
        pdf_path.display(),
        frames.len(),
        if frames.len() == 1 { "" } else { "s" }
    );
    Ok(pdf_path)
}

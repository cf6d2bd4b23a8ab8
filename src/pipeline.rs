//! Batch pipeline: discover, filter, convert, merge, clean up.
//!
//! A linear state machine with no branching back: list the input
//! directory, filter candidates through the manifest and the signature
//! validator, convert each survivor to an intermediate PDF, merge the
//! intermediates in filter order into one dated output file, then remove
//! intermediates and (per policy) source files.
//!
//! Intermediate PDFs are tracked in a scoped guard that deletes them on
//! every exit path — success and failure alike — so an aborted batch never
//! strands artifacts in the input directory.

use crate::convert;
use crate::detect::{self, ByteOrder};
use crate::error::{Error, Result};
use crate::manifest::BatchManifest;
use crate::merge::PdfMerger;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which source files to delete after a successful merge.
///
/// The reference workflow deletes every manifested file, converted or not
/// — including files that failed the signature check. That scope is a
/// data-loss hazard, so it is a named policy here rather than an implicit
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DeletePolicy {
    /// Delete every input-directory entry named in the manifest.
    #[default]
    AllManifested,
    /// Delete only sources that were successfully converted and merged.
    OnlyConverted,
    /// Delete no source files.
    Keep,
}

/// How to react when converting one file fails mid-batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FailurePolicy {
    /// Abort the whole batch on the first conversion failure; no output is
    /// produced and no source is deleted.
    #[default]
    Abort,
    /// Log the failure, exclude the file, and continue with the rest.
    Skip,
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Byte order the signature validator expects.
    pub byte_order: ByteOrder,
    /// Source-deletion scope applied after a successful merge.
    pub delete_policy: DeletePolicy,
    /// Reaction to a per-file conversion failure.
    pub failure_policy: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::host(),
            delete_policy: DeletePolicy::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl BatchOptions {
    /// Create options with host byte order and reference policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order the validator expects.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the source-deletion policy.
    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Set the conversion-failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Result of a completed batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Path of the merged output file.
    pub output_path: PathBuf,
    /// Sources converted and merged, in page order.
    pub converted: Vec<PathBuf>,
    /// Sources excluded by the `Skip` failure policy.
    pub skipped: Vec<PathBuf>,
    /// Source files removed during cleanup.
    pub deleted_sources: Vec<PathBuf>,
}

/// List `input_dir` and keep entries that pass all three filters:
/// `.tif`/`.tiff` extension, manifest membership, and signature
/// acceptance.
///
/// Survivor order follows the directory listing, not the manifest — the
/// two may differ, and listing order is what governs final page order.
pub fn discover(
    input_dir: &Path,
    manifest: &BatchManifest,
    byte_order: ByteOrder,
) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_tiff_extension(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !manifest.contains(name) {
            continue;
        }
        if !detect::is_tiff(&path, byte_order) {
            continue;
        }
        sources.push(path);
    }
    Ok(sources)
}

fn has_tiff_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// Build the merged output's file name from the job identifier and a
/// timestamp. Pure over its inputs.
pub fn output_file_name(job_id: &str, at: NaiveDateTime) -> String {
    format!("{}_merged_{}.pdf", job_id, at.format("%Y_%m_%d_%H_%M_%S"))
}

/// Intermediate PDFs created by this run; removed when the guard drops,
/// on success and failure paths alike.
#[derive(Default)]
struct IntermediateGuard {
    paths: Vec<PathBuf>,
}

impl Drop for IntermediateGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            match fs::remove_file(path) {
                Ok(()) => log::info!("Removed intermediate {}", path.display()),
                Err(e) => log::warn!(
                    "Failed to remove intermediate {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}

/// Run one batch: filter `input_dir` through `manifest`, convert and merge
/// the survivors, write the dated output under `output_dir`, and clean up.
///
/// # Returns
///
/// A [`BatchReport`] whose `output_path` names the merged PDF.
///
/// # Errors
///
/// * `Error::EmptyBatch` - filtering (or skipping) left nothing to merge
/// * `Error::NotFound` / `Error::Conversion` - a per-file failure under the
///   `Abort` policy
/// * `Error::Merge` - failure while appending or writing the final output;
///   no partial output is left behind
pub fn run_batch(
    input_dir: &Path,
    manifest: &BatchManifest,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let sources = discover(input_dir, manifest, options.byte_order)?;
    if sources.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let mut intermediates = IntermediateGuard::default();
    let mut converted: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();

    for source in sources {
        match convert::convert_to_pdf(&source) {
            Ok(pdf) => {
                intermediates.paths.push(pdf.clone());
                converted.push((source, pdf));
            }
            Err(e) => match options.failure_policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    log::warn!("Skipping {}: {}", source.display(), e);
                    skipped.push(source);
                }
            },
        }
    }

    if converted.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let mut merger = PdfMerger::new();
    for (_, pdf) in &converted {
        merger.append(pdf)?;
    }
    let page_count = merger.page_count();

    let file_name = output_file_name(manifest.job_id(), chrono::Local::now().naive_local());
    let output_path = output_dir.join(file_name);
    merger.write(&output_path)?;

    let deleted_sources = delete_sources(input_dir, manifest, &converted, options.delete_policy)?;

    log::info!(
        "{} created: {} pages from {} source files",
        output_path.display(),
        page_count,
        converted.len()
    );

    Ok(BatchReport {
        output_path,
        converted: converted.into_iter().map(|(source, _)| source).collect(),
        skipped,
        deleted_sources,
    })
}

/// Remove source files after a successful merge, per policy.
fn delete_sources(
    input_dir: &Path,
    manifest: &BatchManifest,
    converted: &[(PathBuf, PathBuf)],
    policy: DeletePolicy,
) -> Result<Vec<PathBuf>> {
    let mut deleted = Vec::new();
    match policy {
        DeletePolicy::Keep => {}
        DeletePolicy::OnlyConverted => {
            for (source, _) in converted {
                fs::remove_file(source)?;
                log::info!("Removed source {}", source.display());
                deleted.push(source.clone());
            }
        }
        DeletePolicy::AllManifested => {
            for entry in fs::read_dir(input_dir)? {
                let path = entry?.path();
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !path.is_file() || !manifest.contains(name) {
                    continue;
                }
                fs::remove_file(&path)?;
                log::info!("Removed source {}", path.display());
                deleted.push(path);
            }
        }
    }
    Ok(deleted)
}

//! Batch manifest: the caller-supplied list of authorized file names.

use std::collections::HashSet;

/// Read-only input to the batch pipeline: a job identifier plus the set of
/// file names authorized for this run.
///
/// The job identifier is normalized at construction (lower-cased, commas
/// replaced with underscores) since it becomes the leading component of the
/// merged output's file name. Manifest entries that cannot name a directory
/// entry — empty strings or anything containing a path separator — are
/// rejected at construction rather than loosely matched later.
#[derive(Debug, Clone)]
pub struct BatchManifest {
    job_id: String,
    names: HashSet<String>,
}

impl BatchManifest {
    /// Create a manifest from a raw job identifier and file names.
    pub fn new<I, S>(job_id: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = HashSet::new();
        for name in names {
            let name = name.into();
            if !is_plain_file_name(&name) {
                log::warn!("Ignoring manifest entry {:?}: not a plain file name", name);
                continue;
            }
            set.insert(name);
        }
        Self {
            job_id: normalize_job_id(job_id),
            names: set,
        }
    }

    /// The normalized job identifier.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Whether `name` is authorized by this manifest.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of accepted entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no entries were accepted.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize_job_id(raw: &str) -> String {
    raw.to_lowercase().replace(',', "_")
}

/// A manifest entry must be a bare file name, not a path.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c == '/' || c == '\\')
}

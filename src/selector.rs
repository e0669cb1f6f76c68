//! Candidate selection
//!
//! A single non-recursive pass over the source directory. Names are matched by
//! substring containment, not by suffix: with include `.cs`, `foo.cs.bak` and
//! `foo.csx` both pass.

use std::fs;
use std::path::Path;

use crate::error::{DoxyError, DoxyResult};

/// Include/exclude name markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    include: String,
    exclude: String,
}

impl NameFilter {
    pub fn new(include: impl Into<String>, exclude: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            exclude: exclude.into(),
        }
    }

    /// True when `name` contains the include marker and not the exclude marker.
    ///
    /// An empty exclude marker excludes nothing.
    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.include.as_str())
            && (self.exclude.is_empty() || !name.contains(self.exclude.as_str()))
    }
}

/// A source file selected for rewriting, with its derived names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Base name inside the source directory
    pub name: String,
    /// Name of the temporary copy read during rewriting
    pub temp_name: String,
    /// Name of the output artifact inside the output directory
    pub output_name: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, suffix: &str) -> Self {
        let name = name.into();
        let (stem, ext) = split_extension(&name);
        Self {
            temp_name: format!("{stem}_temp{ext}"),
            output_name: format!("{stem}{suffix}{ext}"),
            name,
        }
    }

    /// File stem used as the temporary copy's prefix.
    pub fn temp_prefix(&self) -> &str {
        split_extension(&self.temp_name).0
    }

    /// Extension (with its dot) shared by the source, temp copy and output.
    pub fn extension(&self) -> &str {
        split_extension(&self.name).1
    }
}

/// Split at the last `.`; a leading dot is part of the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(idx) => name.split_at(idx),
    }
}

/// List `source_dir` and return every regular file whose name passes `filter`.
///
/// Subdirectories and other non-file entries are skipped by type. The result
/// is sorted by name.
pub fn select_candidates(
    source_dir: &Path,
    filter: &NameFilter,
    suffix: &str,
) -> DoxyResult<Vec<Candidate>> {
    let unavailable = |source| DoxyError::SourceDirectoryUnavailable {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %path.display(), "skipping entry with non-UTF-8 name");
            continue;
        };

        if !filter.matches(&name) {
            continue;
        }

        // follows symlinks
        if !path.is_file() {
            tracing::debug!(name = %name, "skipping non-file entry");
            continue;
        }

        candidates.push(Candidate::new(name, suffix));
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(
        dir = %source_dir.display(),
        count = candidates.len(),
        "selected candidates"
    );

    Ok(candidates)
}

//! Candidate enumeration
//!
//! One directory per group under the sample library root, files sorted by
//! name. Groups are visited in the order given; nothing else is inferred
//! from the directory tree.

use std::path::{Path, PathBuf};

use crate::{Result, RomError};

/// Candidate files of one group, already in visiting order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup {
    pub name: String,
    pub files: Vec<PathBuf>,
}

impl CandidateGroup {
    pub fn new(name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }
}

/// Collect `<root>/<group>/*.<extension>` for every group that exists
pub fn scan_groups(root: &Path, groups: &[String], extension: &str) -> Result<Vec<CandidateGroup>> {
    let mut out = Vec::with_capacity(groups.len());

    for name in groups {
        let dir = root.join(name);
        if !dir.is_dir() {
            tracing::debug!("Group {} not found at {}", name, dir.display());
            continue;
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| RomError::Scan {
            path: dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RomError::Scan {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if matches {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        tracing::debug!("Group {}: {} candidates", name, files.len());
        out.push(CandidateGroup::new(name.clone(), files));
    }

    Ok(out)
}

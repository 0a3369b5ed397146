//! Initial population of the content index from disk.

use crate::index::{ContentIndex, IndexUpdate};
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Content root {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to walk content root {root:?}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Counts from one bootstrap walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Regular files handed to the index
    pub visited: usize,
    /// Files now present in the index
    pub indexed: usize,
    /// Files whose update failed and were left out
    pub skipped: usize,
}

/// Walk the index root recursively and feed every regular file to the index.
///
/// Any traversal error aborts the walk: serving from an index of unknown
/// completeness is not allowed. A single file failing to stat is logged and
/// skipped.
pub fn build_initial_index(index: &ContentIndex) -> Result<WalkSummary, WalkError> {
    let root = index.root().to_path_buf();
    // A missing root surfaces as a traversal error below.
    if root.exists() && !root.is_dir() {
        return Err(WalkError::NotADirectory(root));
    }

    let mut summary = WalkSummary::default();

    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = entry.map_err(|source| WalkError::Traversal {
            root: root.clone(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        summary.visited += 1;
        match index.upsert_or_remove(entry.path()) {
            Ok(
                IndexUpdate::Inserted(_)
                | IndexUpdate::Replaced { .. }
                | IndexUpdate::Unchanged(_),
            ) => {
                summary.indexed += 1;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", entry.path(), e);
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Indexed {} documents from {:?} ({} files visited, {} skipped)",
        index.len(),
        root,
        summary.visited,
        summary.skipped
    );

    Ok(summary)
}

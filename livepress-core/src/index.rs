//! The live content index: slug -> source path.
//!
//! A [`ContentIndex`] is a cheap handle; clones share the same map. Readers
//! take a shared lock on the map only. Writers are serialized by a separate
//! mutex that is held across the file stat, so the map lock itself is never
//! held while touching the disk and two writers cannot interleave a stat and
//! an update for the same slug.

use crate::slug::SlugMapper;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single published document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub slug: String,
    pub path: PathBuf,
}

/// Outcome of [`ContentIndex::upsert_or_remove`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexUpdate {
    /// Not an indexed file type, or outside the root
    Ignored,
    Inserted(String),
    /// The slug now points at a different path (last write wins)
    Replaced { slug: String, previous: PathBuf },
    Unchanged(String),
    Removed(String),
    /// File is gone and the slug was not indexed
    Absent(String),
}

#[derive(Clone)]
pub struct ContentIndex {
    inner: Arc<Inner>,
}

struct Inner {
    mapper: SlugMapper,
    entries: RwLock<HashMap<String, PathBuf>>,
    writer: Mutex<()>,
}

impl ContentIndex {
    /// Create an empty index for markdown files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_mapper(SlugMapper::markdown(root))
    }

    pub fn with_mapper(mapper: SlugMapper) -> Self {
        Self {
            inner: Arc::new(Inner {
                mapper,
                entries: RwLock::new(HashMap::new()),
                writer: Mutex::new(()),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        self.inner.mapper.root()
    }

    pub fn mapper(&self) -> &SlugMapper {
        &self.inner.mapper
    }

    /// Resolve a slug to its source file.
    pub fn lookup(&self, slug: &str) -> Option<PathBuf> {
        self.inner.entries.read().get(slug).cloned()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.inner.entries.read().contains_key(slug)
    }

    /// Every entry as of a single point in time. Order is unspecified.
    pub fn snapshot(&self) -> Vec<IndexEntry> {
        self.inner
            .entries
            .read()
            .iter()
            .map(|(slug, path)| IndexEntry {
                slug: slug.clone(),
                path: path.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Bring the entry for `path` in line with the disk.
    ///
    /// Inserts or overwrites the mapping if the file exists, removes it if
    /// the file is gone. Paths without the markdown extension are ignored.
    /// A stat failure other than "not found" leaves the index untouched.
    pub fn upsert_or_remove(&self, path: &Path) -> Result<IndexUpdate, IndexError> {
        let Some(slug) = self.inner.mapper.path_to_slug(path) else {
            return Ok(IndexUpdate::Ignored);
        };

        let _writer = self.inner.writer.lock();

        let exists = match std::fs::metadata(path) {
            Ok(meta) => meta.is_file(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(IndexError::Stat {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut entries = self.inner.entries.write();
        let update = if exists {
            match entries.insert(slug.clone(), path.to_path_buf()) {
                None => IndexUpdate::Inserted(slug),
                Some(previous) if previous == path => IndexUpdate::Unchanged(slug),
                Some(previous) => IndexUpdate::Replaced { slug, previous },
            }
        } else {
            match entries.get(&slug) {
                Some(current) if current != path => {
                    // Another file owns this slug now; a stale delete must not evict it.
                    IndexUpdate::Unchanged(slug)
                }
                Some(_) => {
                    entries.remove(&slug);
                    IndexUpdate::Removed(slug)
                }
                None => IndexUpdate::Absent(slug),
            }
        };
        drop(entries);

        tracing::debug!(path = %path.display(), ?update, "Index updated");
        Ok(update)
    }
}

impl std::fmt::Debug for ContentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentIndex")
            .field("root", &self.root())
            .field("entries", &self.len())
            .finish()
    }
}

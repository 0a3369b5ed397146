//! Listing models built from index entries.

use crate::index::IndexEntry;
use crate::metadata::{estimate_reading_time, ReadingTime};
use crate::slug::title_from_path;
use serde::Serialize;
use std::path::PathBuf;

/// A post as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub path: PathBuf,
    /// `None` when the file could not be read for the estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    #[serde(skip)]
    pub reading: Option<ReadingTime>,
}

impl PostSummary {
    /// Derive title and reading time for an index entry.
    ///
    /// A failed reading-time estimate is logged and left empty; it does not
    /// drop the post from the listing.
    pub fn from_entry(entry: IndexEntry) -> Self {
        let reading = match estimate_reading_time(&entry.path) {
            Ok(rt) => Some(rt),
            Err(e) => {
                tracing::warn!("Failed to estimate reading time for {:?}: {}", entry.path, e);
                None
            }
        };

        Self {
            title: title_from_path(&entry.path),
            reading_time: reading.map(|rt| rt.to_string()),
            reading,
            slug: entry.slug,
            path: entry.path,
        }
    }
}

/// Summaries for every entry, sorted by title then slug.
pub fn summarize(entries: Vec<IndexEntry>) -> Vec<PostSummary> {
    let mut posts: Vec<_> = entries.into_iter().map(PostSummary::from_entry).collect();
    posts.sort_by(|a, b| (&a.title, &a.slug).cmp(&(&b.title, &b.slug)));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_summaries_sorted_by_title() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("zebra_notes.md");
        let a = dir.path().join("apple-pie.md");
        fs::write(&a, "one two three").unwrap();
        fs::write(&b, "").unwrap();

        let posts = summarize(vec![
            IndexEntry {
                slug: "zebra-notes".into(),
                path: b,
            },
            IndexEntry {
                slug: "apple-pie".into(),
                path: a,
            },
        ]);

        assert_eq!(posts[0].title, "Apple Pie");
        assert_eq!(posts[0].reading_time.as_deref(), Some("1.0 min"));
        assert_eq!(posts[1].title, "Zebra Notes");
        assert_eq!(posts[1].reading_time.as_deref(), Some("0.0 min"));
    }

    #[test]
    fn test_unreadable_post_kept_without_reading_time() {
        let posts = summarize(vec![IndexEntry {
            slug: "vanished".into(),
            path: PathBuf::from("/nonexistent/vanished.md"),
        }]);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].reading_time, None);
        assert_eq!(posts[0].reading, None);
    }
}

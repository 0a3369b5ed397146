//! Slug generation from content file paths.

use std::path::{Component, Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// Extension of files that participate in the content index.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Maps source paths under a content root to public slugs.
///
/// Rules:
/// - Strip the content root prefix
/// - Strip the markdown extension
/// - Replace underscores with hyphens
/// - Keep directory segments, joined with `/`
/// - Keep casing as-is
///
/// Two files that normalize to the same slug are not detected here; the
/// content index keeps whichever was applied last.
#[derive(Debug, Clone)]
pub struct SlugMapper {
    root: PathBuf,
    extension: String,
}

impl SlugMapper {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Mapper for `.md` files under `root`.
    pub fn markdown(root: impl Into<PathBuf>) -> Self {
        Self::new(root, MARKDOWN_EXTENSION)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a path carries the indexed extension.
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }

    /// Convert a source path to its slug.
    ///
    /// Returns `None` for paths with another extension or outside the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use livepress_core::SlugMapper;
    /// use std::path::Path;
    ///
    /// let mapper = SlugMapper::markdown("blog");
    /// assert_eq!(
    ///     mapper.path_to_slug(Path::new("blog/hello_world.md")),
    ///     Some("hello-world".to_string())
    /// );
    /// assert_eq!(mapper.path_to_slug(Path::new("blog/notes.txt")), None);
    /// ```
    pub fn path_to_slug(&self, path: &Path) -> Option<String> {
        if !self.is_eligible(path) {
            return None;
        }

        let relative = path.strip_prefix(&self.root).ok()?;
        let without_ext = relative.with_extension("");

        let mut segments = Vec::new();
        for component in without_ext.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?.replace('_', "-")),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if segments.is_empty() {
            return None;
        }

        Some(segments.join("/"))
    }
}

/// Display title derived from a file name.
///
/// `my_first-post.md` becomes `My First Post`.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut graphemes = word.graphemes(true);
    match graphemes.next() {
        Some(first) => {
            let mut out = first.to_uppercase();
            out.push_str(graphemes.as_str());
            out
        }
        None => String::new(),
    }
}

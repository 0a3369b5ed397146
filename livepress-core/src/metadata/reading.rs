//! Reading time estimation.

use super::MetadataError;
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated time to read a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadingTime {
    pub minutes: usize,
    pub seconds: usize,
    pub words: usize,
}

impl ReadingTime {
    /// Convert a word count at [`WORDS_PER_MINUTE`].
    ///
    /// Any non-empty document reads as at least one minute; when that floor
    /// applies the seconds are dropped.
    pub fn from_words(words: usize) -> Self {
        let total_seconds = words * 60 / WORDS_PER_MINUTE;
        let mut minutes = total_seconds / 60;
        let mut seconds = total_seconds % 60;

        if minutes == 0 && words > 0 {
            minutes = 1;
            seconds = 0;
        }

        Self {
            minutes,
            seconds,
            words,
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} min", self.minutes, self.seconds)
    }
}

/// Substitution passes, applied in this order to every line.
fn strip_passes() -> &'static [(Regex, &'static str)] {
    static PASSES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PASSES.get_or_init(|| {
        [
            // Images: ![alt](url)
            (r"!\[[^\]]*\]\([^)]*\)", ""),
            // Links: [text](url)
            (r"\[([^\]]*)\]\([^)]*\)", "$1"),
            // Bold: **text** / __text__
            (r"\*\*(.+?)\*\*", "$1"),
            (r"__([^_\s](?:.*?[^_\s])?)__", "$1"),
            // Italic: *text* / _text_ (an underscore run is left for the rule pass)
            (r"\*(\S(?:.*?\S)?)\*", "$1"),
            (r"\b_([^_\s](?:.*?[^_\s])?)_\b", "$1"),
            // Inline code
            (r"`[^`]*`", ""),
            // Strikethrough
            (r"~~(.+?)~~", "$1"),
            // HTML tags
            (r"<[^>]*>", ""),
            // Headings
            (r"^\s{0,3}#{1,6}\s*", ""),
            // Horizontal rules
            (r"^\s{0,3}(?:[-*_]\s*){3,}$", ""),
            // Ordered and unordered list markers
            (r"^\s*(?:\d+[.)]|[*+-])\s+", ""),
            // Blockquotes
            (r"^\s*(?:>\s?)+", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("reading-time pattern is valid"),
                replacement,
            )
        })
        .collect()
    })
}

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Remove markdown syntax from a single line so it doesn't count as words.
pub fn strip_markdown(line: &str) -> String {
    let mut text = line.to_string();
    for (re, replacement) in strip_passes() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text
}

/// Count words in one line after stripping markdown syntax.
pub fn count_words(line: &str) -> usize {
    word_regex().find_iter(&strip_markdown(line)).count()
}

/// Stream a file line by line and estimate its reading time.
///
/// Invalid UTF-8 is replaced rather than rejected, so only open and read
/// failures are errors.
pub fn estimate_reading_time(path: &Path) -> Result<ReadingTime, MetadataError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut words = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        words += count_words(line.trim_end_matches(['\n', '\r']));
    }

    Ok(ReadingTime::from_words(words))
}

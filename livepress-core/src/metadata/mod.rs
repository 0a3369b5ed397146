//! Per-document metadata derived on demand from the file on disk.
//!
//! Nothing here is cached: every call re-reads the file status or contents,
//! so results only change when the file does.

pub mod reading;
pub mod time_source;

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use thiserror::Error;

pub use reading::{estimate_reading_time, strip_markdown, ReadingTime, WORDS_PER_MINUTE};
pub use time_source::{FileTimes, PlatformTimeSource, TimeSource};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Neither birth nor modification time is available")]
    Unavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which timestamp a [`CreationDate`] was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    Birth,
    /// Birth time was not exposed; the last modification time stands in
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationDate {
    pub timestamp: DateTime<Utc>,
    pub kind: TimestampKind,
}

impl CreationDate {
    /// Pick the birth time, falling back to the modification time.
    pub fn from_times(times: FileTimes) -> Result<Self, MetadataError> {
        if let Some(birth) = times.birth {
            return Ok(Self {
                timestamp: birth.into(),
                kind: TimestampKind::Birth,
            });
        }

        match times.modified {
            Some(modified) => Ok(Self {
                timestamp: modified.into(),
                kind: TimestampKind::Modified,
            }),
            None => Err(MetadataError::Unavailable),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == TimestampKind::Modified
    }
}

/// Resolve a document's display date using the platform time source.
pub fn resolve_creation_date(metadata: &Metadata) -> Result<CreationDate, MetadataError> {
    resolve_creation_date_with(&PlatformTimeSource, metadata)
}

pub fn resolve_creation_date_with(
    source: &dyn TimeSource,
    metadata: &Metadata,
) -> Result<CreationDate, MetadataError> {
    CreationDate::from_times(source.file_times(metadata))
}

/// Last modification time, used for feed and sitemap dates.
pub fn modified_time(metadata: &Metadata) -> Result<DateTime<Utc>, MetadataError> {
    PlatformTimeSource
        .file_times(metadata)
        .modified
        .map(Into::into)
        .ok_or(MetadataError::Unavailable)
}

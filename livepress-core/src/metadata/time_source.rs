//! Platform time sources for file birth and modification times.
//!
//! Each target gets its own [`TimeSource`]; [`PlatformTimeSource`] names the
//! one compiled for the current build.

use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Timestamps read from file status. `None` means the platform or
/// filesystem did not report that timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileTimes {
    pub birth: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl FileTimes {
    /// Build from raw values, treating the epoch as "not reported".
    pub fn from_raw(birth: Option<SystemTime>, modified: Option<SystemTime>) -> Self {
        Self {
            birth: birth.filter(|t| *t != UNIX_EPOCH),
            modified: modified.filter(|t| *t != UNIX_EPOCH),
        }
    }
}

pub trait TimeSource: Send + Sync {
    fn file_times(&self, metadata: &Metadata) -> FileTimes;
}

#[cfg(unix)]
pub use unix::UnixTimeSource as PlatformTimeSource;

#[cfg(windows)]
pub use windows::WindowsTimeSource as PlatformTimeSource;

#[cfg(not(any(unix, windows)))]
pub use portable::PortableTimeSource as PlatformTimeSource;

#[cfg(unix)]
mod unix {
    use super::{FileTimes, TimeSource};
    use std::fs::Metadata;
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Birth time from `statx`/`st_birthtime` where the kernel exposes it,
    /// modification time from `st_mtime`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UnixTimeSource;

    impl TimeSource for UnixTimeSource {
        fn file_times(&self, metadata: &Metadata) -> FileTimes {
            FileTimes::from_raw(
                metadata.created().ok(),
                timespec(metadata.mtime(), metadata.mtime_nsec()),
            )
        }
    }

    fn timespec(secs: i64, nsecs: i64) -> Option<SystemTime> {
        let secs = u64::try_from(secs).ok()?;
        let nsecs = u32::try_from(nsecs).ok()?;
        UNIX_EPOCH.checked_add(Duration::new(secs, nsecs))
    }
}

#[cfg(windows)]
mod windows {
    use super::{FileTimes, TimeSource};
    use std::fs::Metadata;
    use std::os::windows::fs::MetadataExt;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// 100ns intervals between 1601-01-01 and 1970-01-01.
    const FILETIME_UNIX_OFFSET: u64 = 116_444_736_000_000_000;

    /// NTFS creation and last-write times.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct WindowsTimeSource;

    impl TimeSource for WindowsTimeSource {
        fn file_times(&self, metadata: &Metadata) -> FileTimes {
            FileTimes::from_raw(
                filetime(metadata.creation_time()),
                filetime(metadata.last_write_time()),
            )
        }
    }

    fn filetime(ticks: u64) -> Option<SystemTime> {
        let since_epoch = ticks.checked_sub(FILETIME_UNIX_OFFSET)?;
        UNIX_EPOCH.checked_add(Duration::from_nanos(since_epoch.saturating_mul(100)))
    }
}

#[cfg(not(any(unix, windows)))]
mod portable {
    use super::{FileTimes, TimeSource};
    use std::fs::Metadata;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct PortableTimeSource;

    impl TimeSource for PortableTimeSource {
        fn file_times(&self, metadata: &Metadata) -> FileTimes {
            FileTimes::from_raw(metadata.created().ok(), metadata.modified().ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_from_raw_filters_epoch() {
        let later = UNIX_EPOCH + Duration::from_secs(5);
        let times = FileTimes::from_raw(Some(UNIX_EPOCH), Some(later));
        assert_eq!(times.birth, None);
        assert_eq!(times.modified, Some(later));
    }

    #[test]
    fn test_platform_source_reports_modified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "x").unwrap();
        let metadata = std::fs::metadata(&path).unwrap();

        let times = PlatformTimeSource.file_times(&metadata);
        assert!(times.modified.is_some());
        assert_eq!(times.modified, metadata.modified().ok());
    }
}

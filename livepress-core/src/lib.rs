//! # livepress-core
//!
//! Live content index for the livepress blog server.
//!
//! This crate maps public slugs to markdown files under a content root and
//! keeps that mapping current while the tree changes underneath it: a
//! bootstrap walk fills the [`ContentIndex`], then a [`ChangeWatcher`] applies
//! filesystem notifications for the life of the process. Document metadata
//! (display date, reading time) is derived on demand by [`metadata`].

pub mod config;
pub mod index;
pub mod metadata;
pub mod models;
pub mod slug;
pub mod walker;
pub mod watcher;

pub use config::{Config, ConfigError};
pub use index::{ContentIndex, IndexEntry, IndexError, IndexUpdate};
pub use metadata::{
    estimate_reading_time, resolve_creation_date, CreationDate, MetadataError, ReadingTime,
    TimestampKind,
};
pub use models::{summarize, PostSummary};
pub use slug::{title_from_path, SlugMapper, MARKDOWN_EXTENSION};
pub use walker::{build_initial_index, WalkError, WalkSummary};
pub use watcher::{
    ChangeKind, ChangeWatcher, LoopExit, WatchError, WatchHandle, WatchOptions, WatcherState,
};

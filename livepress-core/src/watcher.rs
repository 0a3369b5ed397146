//! Keeps the content index in sync with filesystem change notifications.
//!
//! Lifecycle: `Idle` -> `Watching` -> `Stopped`. A stopped watcher cannot be
//! restarted; build a new [`ChangeWatcher`] instead.
//!
//! By default only the content root itself is subscribed. Files in
//! subdirectories are picked up by the bootstrap walk but later changes to
//! them are not seen unless [`WatchOptions::recursive`] is set.
//!
//! Renaming or removing a subdirectory reports only the directory path,
//! which is not a markdown file. Entries for the posts under it stay in the
//! index until a restart rebuilds it.

use crate::index::{ContentIndex, IndexUpdate};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watcher was already started")]
    AlreadyStarted,

    #[error("Failed to initialize file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("Failed to watch {path:?}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Watching,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    pub recursive: bool,
}

/// What a notification means for the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Write,
    Rename,
    Remove,
    /// Permission or other metadata-only change
    Chmod,
    Ignored,
}

impl ChangeKind {
    pub fn classify(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Chmod,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Modify(_) => ChangeKind::Write,
            EventKind::Remove(_) => ChangeKind::Remove,
            // Backend could not tell; re-checking the path is always safe.
            EventKind::Any => ChangeKind::Write,
            EventKind::Access(_) | EventKind::Other => ChangeKind::Ignored,
        }
    }

    pub fn affects_content(self) -> bool {
        !matches!(self, ChangeKind::Chmod | ChangeKind::Ignored)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Write => "WRITE",
            ChangeKind::Rename => "RENAME",
            ChangeKind::Remove => "REMOVE",
            ChangeKind::Chmod => "CHMOD",
            ChangeKind::Ignored => "IGNORED",
        };
        f.write_str(label)
    }
}

/// Why the event loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The notification source went away
    ChannelClosed,
    Shutdown,
}

pub type EventReceiver = mpsc::UnboundedReceiver<notify::Result<Event>>;

pub struct ChangeWatcher {
    index: ContentIndex,
    options: WatchOptions,
    state: Arc<Mutex<WatcherState>>,
}

impl ChangeWatcher {
    pub fn new(index: ContentIndex, options: WatchOptions) -> Self {
        Self {
            index,
            options,
            state: Arc::new(Mutex::new(WatcherState::Idle)),
        }
    }

    pub fn state(&self) -> WatcherState {
        *self.state.lock()
    }

    /// Subscribe to the content root and spawn the event loop.
    ///
    /// Must be called from within a tokio runtime. Failing to subscribe
    /// leaves the watcher `Stopped`.
    pub fn start(&self) -> Result<WatchHandle, WatchError> {
        let mut state = self.state.lock();
        if *state != WatcherState::Idle {
            return Err(WatchError::AlreadyStarted);
        }

        let root = self.index.root().to_path_buf();
        let mode = if self.options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let subscribed = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(WatchError::Init)
        .and_then(|mut watcher| {
            watcher
                .watch(&root, mode)
                .map_err(|source| WatchError::Subscribe {
                    path: root.clone(),
                    source,
                })?;
            Ok(watcher)
        });

        let watcher = match subscribed {
            Ok(watcher) => watcher,
            Err(e) => {
                *state = WatcherState::Stopped;
                return Err(e);
            }
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn({
            let index = self.index.clone();
            let state = self.state.clone();
            async move {
                let exit = run_event_loop(index, rx, shutdown_rx).await;
                *state.lock() = WatcherState::Stopped;
                exit
            }
        });

        *state = WatcherState::Watching;
        tracing::info!("Watching {:?} for changes (recursive: {})", root, self.options.recursive);

        Ok(WatchHandle {
            watcher,
            shutdown: shutdown_tx,
            task,
            state: self.state.clone(),
        })
    }
}

/// Owns a running subscription. Dropping it also ends the event loop.
pub struct WatchHandle {
    watcher: RecommendedWatcher,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<LoopExit>,
    state: Arc<Mutex<WatcherState>>,
}

impl WatchHandle {
    pub fn state(&self) -> WatcherState {
        *self.state.lock()
    }

    /// Signal shutdown, tear down the subscription and wait for the loop.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        drop(self.watcher);

        match self.task.await {
            Ok(exit) => tracing::info!("Change watcher stopped ({:?})", exit),
            Err(e) => tracing::error!("Change watcher task failed: {}", e),
        }
        *self.state.lock() = WatcherState::Stopped;
    }
}

/// Drain notifications one at a time, in delivery order.
///
/// Returns when the sender side closes or `shutdown` fires (or its sender
/// is dropped). Notification errors are logged and skipped.
pub async fn run_event_loop(
    index: ContentIndex,
    mut events: EventReceiver,
    mut shutdown: oneshot::Receiver<()>,
) -> LoopExit {
    loop {
        tokio::select! {
            _ = &mut shutdown => return LoopExit::Shutdown,
            received = events.recv() => match received {
                Some(Ok(event)) => {
                    apply_event(&index, &event);
                }
                Some(Err(err)) => tracing::warn!("Watcher error: {}", err),
                None => return LoopExit::ChannelClosed,
            },
        }
    }
}

/// Apply one notification to the index.
///
/// Each path of a relevant event goes through the same update entry point
/// as the bootstrap walk; a rename carries both the old and the new path.
/// The per-path cost is a single stat, so this runs inline on the loop.
pub fn apply_event(index: &ContentIndex, event: &Event) -> Vec<IndexUpdate> {
    let kind = ChangeKind::classify(&event.kind);
    if !kind.affects_content() {
        tracing::trace!("Ignoring {:?} for {:?}", event.kind, event.paths);
        return Vec::new();
    }

    let mut updates = Vec::with_capacity(event.paths.len());
    for path in &event.paths {
        match index.upsert_or_remove(path) {
            Ok(IndexUpdate::Ignored) => {}
            Ok(update) => {
                tracing::info!("{}: {}", kind, path.display());
                updates.push(update);
            }
            Err(e) => tracing::warn!("Failed to apply {} for {:?}: {}", kind, path, e),
        }
    }
    updates
}

//! End-to-end tests: bootstrap walk plus real filesystem notifications.

use livepress_core::{build_initial_index, ChangeWatcher, ContentIndex, WatchOptions, WatcherState};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

async fn wait_for(index: &ContentIndex, slug: &str, present: bool) -> bool {
    for _ in 0..100 {
        if index.contains(slug) == present {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

fn canonical_root(path: &Path) -> std::path::PathBuf {
    // macOS reports event paths under /private/var; match it up front.
    path.canonicalize().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_tracks_create_edit_delete() {
    let dir = tempdir().unwrap();
    let root = canonical_root(dir.path());
    fs::write(root.join("existing_post.md"), "# Existing").unwrap();

    let index = ContentIndex::new(&root);
    build_initial_index(&index).unwrap();
    assert!(index.contains("existing-post"));

    let watcher = ChangeWatcher::new(index.clone(), WatchOptions::default());
    let handle = watcher.start().unwrap();

    let created = root.join("brand_new.md");
    fs::write(&created, "fresh words").unwrap();
    assert!(wait_for(&index, "brand-new", true).await, "create not observed");
    assert_eq!(index.lookup("brand-new"), Some(created.clone()));

    fs::write(&created, "edited words").unwrap();
    fs::remove_file(root.join("existing_post.md")).unwrap();
    assert!(wait_for(&index, "existing-post", false).await, "delete not observed");
    assert!(index.contains("brand-new"));

    fs::write(root.join("ignored.txt"), "not markdown").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(index.len(), 1);

    handle.stop().await;
    assert_eq!(watcher.state(), WatcherState::Stopped);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rename_replaces_slug() {
    let dir = tempdir().unwrap();
    let root = canonical_root(dir.path());
    fs::write(root.join("draft_title.md"), "body").unwrap();

    let index = ContentIndex::new(&root);
    build_initial_index(&index).unwrap();

    let watcher = ChangeWatcher::new(index.clone(), WatchOptions::default());
    let handle = watcher.start().unwrap();

    fs::rename(root.join("draft_title.md"), root.join("final_title.md")).unwrap();
    assert!(wait_for(&index, "final-title", true).await, "rename target not observed");
    assert!(wait_for(&index, "draft-title", false).await, "rename source not removed");

    handle.stop().await;
}

#[test]
fn test_bootstrap_matches_disk() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("series")).unwrap();
    for name in ["a.md", "b_c.md", "series/part_1.md", "notes.txt"] {
        fs::write(root.join(name), "text").unwrap();
    }

    let index = ContentIndex::new(root);
    let summary = build_initial_index(&index).unwrap();
    assert_eq!(summary.indexed, 3);

    for (slug, rel) in [("a", "a.md"), ("b-c", "b_c.md"), ("series/part-1", "series/part_1.md")] {
        assert_eq!(index.lookup(slug), Some(root.join(rel)));
    }
}

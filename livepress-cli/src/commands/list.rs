//! Print what the server would publish.

use anyhow::{Context, Result};
use livepress_core::{build_initial_index, summarize, Config, ContentIndex};
use std::path::Path;

pub fn list_posts(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    let index = ContentIndex::new(config.content_dir());
    build_initial_index(&index).context("Failed to walk content directory")?;

    let mut posts = summarize(index.snapshot());
    posts.sort_by(|a, b| a.slug.cmp(&b.slug));

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts found in {:?}", index.root());
        return Ok(());
    }

    for post in &posts {
        println!(
            "{:<40} {:>10}  {}",
            post.slug,
            post.reading_time.as_deref().unwrap_or("-"),
            post.path.display()
        );
    }
    println!("\n{} posts", posts.len());

    Ok(())
}

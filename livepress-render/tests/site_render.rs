//! Rendering against a real content tree.

use livepress_core::{build_initial_index, Config, ContentIndex};
use livepress_render::Site;
use std::fs;
use tempfile::{tempdir, TempDir};

fn config() -> Config {
    Config::from_yaml(
        r#"
site:
  name: "Jane Doe"
  profession: "Systems Engineer"
  description: "Writing about <systems>"
  blog_name: "Field Notes"
  url: "https://example.com"
  repository: "https://github.com/jane/site/blob/main/"
"#,
    )
    .unwrap()
}

fn site_with(posts: &[(&str, &str)]) -> (TempDir, Site) {
    let dir = tempdir().unwrap();
    let root = dir.path().join("blog");
    fs::create_dir_all(&root).unwrap();
    for (name, body) in posts {
        fs::write(root.join(name), body).unwrap();
    }

    let index = ContentIndex::new(&root);
    build_initial_index(&index).unwrap();
    (dir, Site::new(config(), index))
}

#[test]
fn test_home_page() {
    let (_dir, site) = site_with(&[]);
    let html = site.home().unwrap();
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("Systems Engineer"));
    assert!(html.contains("Writing about &"));
    assert!(!html.contains("<systems>"));
}

#[test]
fn test_blog_index_sorted_with_reading_time() {
    let long = "word ".repeat(450);
    let (_dir, site) = site_with(&[("zig_notes.md", "short"), ("async_rust.md", long.as_str())]);
    let html = site.blog_index().unwrap();

    let async_pos = html.find("Async Rust").unwrap();
    let zig_pos = html.find("Zig Notes").unwrap();
    assert!(async_pos < zig_pos);
    assert!(html.contains("href=\"/blog/async-rust\""));
    assert!(html.contains("2.15 min"));
    assert!(html.contains("1.0 min"));
}

#[test]
fn test_empty_blog_index() {
    let (_dir, site) = site_with(&[]);
    assert!(site.blog_index().unwrap().contains("Nothing published yet."));
}

#[test]
fn test_post_page() {
    let (_dir, site) = site_with(&[("hello_world.md", "Some **bold** text.\n")]);
    let html = site.post("hello-world").unwrap().expect("post exists");

    assert!(html.contains("<h1>Hello World</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains("Field Notes - Hello World"));
    assert!(html.contains("class=\"post-date\""));
    assert!(html.contains("blog/hello_world.md?plain=1"));
}

#[test]
fn test_unknown_post() {
    let (_dir, site) = site_with(&[("a.md", "x")]);
    assert!(site.post("missing").unwrap().is_none());
}

#[test]
fn test_post_vanished_from_disk() {
    let (dir, site) = site_with(&[("gone.md", "x")]);
    fs::remove_file(dir.path().join("blog/gone.md")).unwrap();
    assert!(site.post("gone").unwrap().is_none());
}

#[test]
fn test_not_found_page() {
    let (_dir, site) = site_with(&[]);
    let html = site.not_found().unwrap();
    assert!(html.contains("404"));
    assert!(html.contains("Field Notes"));
}

#[test]
fn test_rss_feed() {
    let (_dir, site) = site_with(&[("first_post.md", "# Hi\n\nA <b>tag</b> & more.\n")]);
    let xml = site.rss().unwrap();

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<title>Field Notes</title>"));
    assert!(xml.contains("<link>https://example.com/blog/first-post</link>"));
    assert!(xml.contains("<guid>https://example.com/blog/first-post</guid>"));
    assert!(xml.contains("href=\"https://example.com/rss.xml\""));
    assert!(xml.contains("<language>en-gb</language>"));
    // HTML description is escaped inside the XML
    assert!(xml.contains("h1&"));
    assert!(!xml.contains("<h1>"));
    assert!(!xml.contains("<b>tag</b>"));
}

#[test]
fn test_sitemap() {
    let (_dir, site) = site_with(&[("a.md", "x"), ("b_c.md", "y")]);
    let xml = site.sitemap().unwrap();

    assert!(xml.contains("http://www.sitemaps.org/schemas/sitemap/0.9"));
    let home = xml.find("<loc>https://example.com/</loc>").unwrap();
    let blog = xml.find("<loc>https://example.com/blog</loc>").unwrap();
    let post = xml.find("<loc>https://example.com/blog/b-c</loc>").unwrap();
    assert!(home < blog && blog < post);
    assert!(xml.contains("<loc>https://example.com/blog/a</loc>"));
    assert_eq!(xml.matches("<changefreq>monthly</changefreq>").count(), 2);
}

#[test]
fn test_render_follows_index_updates() {
    let (dir, site) = site_with(&[]);
    assert!(site.post("late").unwrap().is_none());

    let path = dir.path().join("blog/late.md");
    fs::write(&path, "arrived").unwrap();
    site.index().upsert_or_remove(&path).unwrap();

    assert!(site.post("late").unwrap().is_some());
    assert!(site.blog_index().unwrap().contains("Late"));
}

//! # livepress-render
//!
//! Page, feed and sitemap rendering for livepress.
//!
//! This crate reads the live content index and turns it into HTML pages
//! (Askama templates), an RSS feed and a sitemap.

pub mod feed;
pub mod markdown;
pub mod site;
pub mod templates;

pub use markdown::MarkdownProcessor;
pub use site::{format_display_date, source_url, RenderError, Site};
pub use templates::{
    BlogIndexTemplate, IndexTemplate, NotFoundTemplate, PostTemplate, RssTemplate,
    SitemapTemplate,
};

//! Askama template definitions.

use crate::feed::{RssChannel, SitemapUrl};
use askama::Template;
use livepress_core::PostSummary;

/// Home page template
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    // Page metadata
    pub page_title: String,
    pub description: String,
    pub language: String,

    // Site metadata
    pub site_name: String,
    pub blog_name: String,
    pub profession: String,
    pub year: i32,
}

/// Blog listing template
#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub page_title: String,
    pub description: String,
    pub language: String,

    pub site_name: String,
    pub blog_name: String,
    pub profession: String,
    pub year: i32,

    // Sorted by title
    pub posts: Vec<PostSummary>,
}

/// Single post template
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub page_title: String,
    pub description: String,
    pub language: String,

    pub site_name: String,
    pub blog_name: String,
    pub year: i32,

    // Content
    pub title: String,
    pub date: Option<String>,
    pub reading_time: Option<String>,
    pub content: String,
    pub source_url: Option<String>,
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub page_title: String,
    pub description: String,
    pub language: String,

    pub site_name: String,
    pub blog_name: String,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "rss.xml")]
pub struct RssTemplate {
    pub channel: RssChannel,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub urls: Vec<SitemapUrl>,
}

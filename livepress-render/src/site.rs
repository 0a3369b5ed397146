//! Page rendering on top of the live content index.
//!
//! Every method reads the index at call time, so output follows the
//! content tree as the watcher updates it. Methods do blocking file I/O.

use crate::feed::{sort_sitemap, ChangeFreq, RssChannel, RssItem, SitemapUrl};
use crate::markdown::MarkdownProcessor;
use crate::templates::{
    BlogIndexTemplate, IndexTemplate, NotFoundTemplate, PostTemplate, RssTemplate,
    SitemapTemplate,
};
use askama::Template;
use chrono::{DateTime, Datelike, Local, Utc};
use livepress_core::metadata::modified_time;
use livepress_core::{
    estimate_reading_time, resolve_creation_date, summarize, title_from_path, Config,
    ContentIndex, IndexEntry, MetadataError,
};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// "January 2, 2006 3:04 PM"
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone)]
pub struct Site {
    config: Arc<Config>,
    index: ContentIndex,
    markdown: Arc<MarkdownProcessor>,
}

impl Site {
    pub fn new(config: Config, index: ContentIndex) -> Self {
        Self {
            config: Arc::new(config),
            index,
            markdown: Arc::new(MarkdownProcessor::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    pub fn home(&self) -> Result<String, RenderError> {
        let site = &self.config.site;
        let page = IndexTemplate {
            page_title: site.name.clone(),
            description: site.description.clone(),
            language: site.language.clone(),
            site_name: site.name.clone(),
            blog_name: site.blog_name.clone(),
            profession: site.profession.clone(),
            year: current_year(),
        };
        Ok(page.render()?)
    }

    pub fn blog_index(&self) -> Result<String, RenderError> {
        let site = &self.config.site;
        let page = BlogIndexTemplate {
            page_title: site.blog_name.clone(),
            description: site.description.clone(),
            language: site.language.clone(),
            site_name: site.name.clone(),
            blog_name: site.blog_name.clone(),
            profession: site.profession.clone(),
            year: current_year(),
            posts: summarize(self.index.snapshot()),
        };
        Ok(page.render()?)
    }

    /// Render a post, or `None` if the slug is unknown or its file vanished.
    ///
    /// A missing display date or reading time is left out of the page.
    pub fn post(&self, slug: &str) -> Result<Option<String>, RenderError> {
        let Some(path) = self.index.lookup(slug) else {
            return Ok(None);
        };

        let markdown = match fs::read_to_string(&path) {
            Ok(markdown) => markdown,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let created = fs::metadata(&path)
            .map_err(MetadataError::from)
            .and_then(|m| resolve_creation_date(&m));
        let date = match created {
            Ok(created) => Some(format_display_date(created.timestamp)),
            Err(e) => {
                tracing::warn!("No display date for {:?}: {}", path, e);
                None
            }
        };

        let reading_time = estimate_reading_time(&path)
            .map_err(|e| tracing::warn!("No reading time for {:?}: {}", path, e))
            .ok()
            .map(|rt| rt.to_string());

        let site = &self.config.site;
        let title = title_from_path(&path);
        let page = PostTemplate {
            page_title: format!("{} - {}", site.blog_name, title),
            description: site.description.clone(),
            language: site.language.clone(),
            site_name: site.name.clone(),
            blog_name: site.blog_name.clone(),
            year: current_year(),
            title,
            date,
            reading_time,
            content: self.markdown.convert(&markdown),
            source_url: site
                .repository
                .as_deref()
                .map(|repo| source_url(repo, self.index.root(), &path)),
        };
        Ok(Some(page.render()?))
    }

    pub fn not_found(&self) -> Result<String, RenderError> {
        let site = &self.config.site;
        let page = NotFoundTemplate {
            page_title: format!("Not found - {}", site.name),
            description: site.description.clone(),
            language: site.language.clone(),
            site_name: site.name.clone(),
            blog_name: site.blog_name.clone(),
            year: current_year(),
        };
        Ok(page.render()?)
    }

    /// RSS 2.0 feed of every post, newest first. Unreadable posts are skipped.
    pub fn rss(&self) -> Result<String, RenderError> {
        let site = &self.config.site;
        let items = self
            .index
            .snapshot()
            .into_iter()
            .filter_map(|entry| self.rss_item(entry))
            .collect();

        let mut channel = RssChannel {
            title: site.blog_name.clone(),
            link: self.config.public_url("/blog"),
            description: site.description.clone(),
            self_link: self.config.public_url("/rss.xml"),
            language: site.language.clone(),
            pub_date: Utc::now(),
            copyright: site.copyright.clone(),
            items,
        };
        channel.sort_items();

        Ok(RssTemplate { channel }.render()?)
    }

    fn rss_item(&self, entry: IndexEntry) -> Option<RssItem> {
        let modified = fs::metadata(&entry.path)
            .map_err(MetadataError::from)
            .and_then(|m| modified_time(&m));
        let markdown = fs::read_to_string(&entry.path);

        match (modified, markdown) {
            (Ok(pub_date), Ok(markdown)) => Some(RssItem {
                title: title_from_path(&entry.path),
                link: self.post_url(&entry.slug),
                description: self.markdown.convert(&markdown),
                pub_date,
            }),
            (Err(e), _) => {
                tracing::warn!("Skipping {:?} in feed: {}", entry.path, e);
                None
            }
            (_, Err(e)) => {
                tracing::warn!("Skipping {:?} in feed: {}", entry.path, e);
                None
            }
        }
    }

    /// Sitemap: home, blog index, then every post by modification time.
    pub fn sitemap(&self) -> Result<String, RenderError> {
        let now = Utc::now();
        let pages = vec![
            SitemapUrl {
                loc: self.config.public_url("/"),
                lastmod: now,
                changefreq: ChangeFreq::Daily,
                priority: "1.0",
            },
            SitemapUrl {
                loc: self.config.public_url("/blog"),
                lastmod: now,
                changefreq: ChangeFreq::Weekly,
                priority: "0.9",
            },
        ];

        let posts = self
            .index
            .snapshot()
            .into_iter()
            .filter_map(|entry| {
                let lastmod = fs::metadata(&entry.path)
                    .map_err(MetadataError::from)
                    .and_then(|m| modified_time(&m));
                match lastmod {
                    Ok(lastmod) => Some(SitemapUrl {
                        loc: self.post_url(&entry.slug),
                        lastmod,
                        changefreq: ChangeFreq::Monthly,
                        priority: "0.8",
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping {:?} in sitemap: {}", entry.path, e);
                        None
                    }
                }
            })
            .collect();

        let urls = sort_sitemap(pages, posts);
        Ok(SitemapTemplate { urls }.render()?)
    }

    pub fn post_url(&self, slug: &str) -> String {
        self.config.public_url(&format!("/blog/{slug}"))
    }
}

pub fn format_display_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(DISPLAY_DATE_FORMAT)
        .to_string()
}

/// Repository link for a post: `repo` + path under the content root's parent + `?plain=1`.
pub fn source_url(repository: &str, root: &Path, path: &Path) -> String {
    let base = root.parent().unwrap_or(root);
    let relative = path.strip_prefix(base).unwrap_or(path);
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("{}{}?plain=1", repository, segments.join("/"))
}

fn current_year() -> i32 {
    Local::now().year()
}

//! RSS feed and sitemap models.

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone)]
pub struct RssChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub self_link: String,
    pub language: String,
    pub pub_date: DateTime<Utc>,
    pub copyright: String,
    pub items: Vec<RssItem>,
}

impl RssChannel {
    pub fn pub_date_rfc2822(&self) -> String {
        self.pub_date.to_rfc2822()
    }

    /// Newest first.
    pub fn sort_items(&mut self) {
        self.items
            .sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| a.link.cmp(&b.link)));
    }
}

#[derive(Debug, Clone)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    /// Rendered HTML; escaped when written into the feed
    pub description: String,
    pub pub_date: DateTime<Utc>,
}

impl RssItem {
    pub fn pub_date_rfc2822(&self) -> String {
        self.pub_date.to_rfc2822()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: ChangeFreq,
    pub priority: &'static str,
}

impl SitemapUrl {
    pub fn lastmod_w3c(&self) -> String {
        self.lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Fixed pages first, then posts newest first.
pub fn sort_sitemap(pages: Vec<SitemapUrl>, mut posts: Vec<SitemapUrl>) -> Vec<SitemapUrl> {
    posts.sort_by(|a, b| b.lastmod.cmp(&a.lastmod).then_with(|| a.loc.cmp(&b.loc)));
    pages.into_iter().chain(posts).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn item(link: &str, secs: i64) -> RssItem {
        RssItem {
            title: link.into(),
            link: link.into(),
            description: String::new(),
            pub_date: at(secs),
        }
    }

    #[test]
    fn test_items_newest_first() {
        let mut channel = RssChannel {
            title: "t".into(),
            link: "l".into(),
            description: "d".into(),
            self_link: "s".into(),
            language: "en-gb".into(),
            pub_date: at(0),
            copyright: "c".into(),
            items: vec![item("old", 100), item("new", 300), item("mid", 200)],
        };
        channel.sort_items();
        let links: Vec<_> = channel.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_date_formats() {
        let i = item("x", 1_700_000_000);
        insta::assert_snapshot!(i.pub_date_rfc2822(), @"Tue, 14 Nov 2023 22:13:20 +0000");

        let url = SitemapUrl {
            loc: "x".into(),
            lastmod: at(1_700_000_000),
            changefreq: ChangeFreq::Monthly,
            priority: "0.8",
        };
        assert_eq!(url.lastmod_w3c(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_sitemap_order() {
        let url = |loc: &str, secs| SitemapUrl {
            loc: loc.into(),
            lastmod: at(secs),
            changefreq: ChangeFreq::Monthly,
            priority: "0.8",
        };
        let sorted = sort_sitemap(vec![url("home", 0)], vec![url("a", 10), url("b", 20)]);
        let locs: Vec<_> = sorted.iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(locs, vec!["home", "b", "a"]);
    }
}

//! Homepage-crawl discovery: scan the entry page for article-shaped links.
//!
//! Last-resort strategy for sites whose sitemaps and feeds are unusable.
//! It yields no dates or titles, only URLs; the extractor fills the rest.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use prensa_core::{DiscoveryEntry, SiteDescriptor};

use crate::client::PageClient;
use crate::discover::sitemap::dedupe_by_url;

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*["']([^"'\s>]+)["']"#).expect("valid href regex"));

/// Path segments that mark listing/service pages rather than articles.
const NON_ARTICLE_SEGMENTS: [&str; 8] = [
    "tag", "tags", "temas", "autor", "autores", "video", "videos", "en-directo",
];

/// Scan the site's crawl entry point (or homepage) for article links.
///
/// Never fails: a fetch error logs and returns an empty list.
pub(crate) async fn discover(
    client: &PageClient,
    site: &SiteDescriptor,
    _days_back: i64,
) -> Vec<DiscoveryEntry> {
    let entry_url = site.crawl_url.as_deref().unwrap_or(&site.base_url);

    let html = match client.fetch_text(entry_url, site).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(site = %site.name, url = %entry_url, error = %e, "crawl fetch failed");
            return Vec::new();
        }
    };

    let Ok(base) = Url::parse(entry_url) else {
        tracing::warn!(site = %site.name, url = %entry_url, "crawl entry point is not a valid URL");
        return Vec::new();
    };

    let entries = extract_article_links(&html, &base)
        .into_iter()
        .map(DiscoveryEntry::new)
        .collect();
    dedupe_by_url(entries)
}

/// Pull article-shaped, same-host links out of raw HTML, resolved against
/// `base`, in document order.
fn extract_article_links(html: &str, base: &Url) -> Vec<String> {
    HREF.captures_iter(html)
        .filter_map(|caps| base.join(caps.get(1)?.as_str()).ok())
        .filter(|url| same_host(url, base) && looks_like_article(url))
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}

/// Hosts match after stripping an optional `www.` prefix.
fn same_host(url: &Url, base: &Url) -> bool {
    match (url.host_str(), base.host_str()) {
        (Some(a), Some(b)) => {
            a.trim_start_matches("www.") == b.trim_start_matches("www.")
        }
        _ => false,
    }
}

/// Heuristic for article URLs: a slug-looking final segment (long and
/// hyphenated, or `.html`), at least one path level deep, and not under a
/// listing/service section.
fn looks_like_article(url: &Url) -> bool {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segs| segs.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let Some(last) = segments.last() else {
        return false;
    };
    if segments
        .iter()
        .any(|s| NON_ARTICLE_SEGMENTS.contains(&s.to_lowercase().as_str()))
    {
        return false;
    }

    let slug_like = last.matches('-').count() >= 3 && last.len() >= 20;
    let html_page = last.ends_with(".html") && last.len() > ".html".len();
    slug_like || html_page
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;

//! RSS/Atom/MRSS discovery via `feed-rs`, with a forced-UTF-8 re-parse for
//! feeds whose declared encoding does not match their bytes.

use chrono::{DateTime, Duration, Utc};
use feed_rs::model::Feed;
use url::Url;

use prensa_core::{DiscoveryEntry, SiteDescriptor};

use crate::client::PageClient;
use crate::discover::sitemap::dedupe_by_url;
use crate::error::ScrapeError;
use crate::normalize::strip_html;

/// Collect candidate URLs from every configured feed of `site`.
///
/// Never fails: per-feed fetch and parse errors are logged and degrade to
/// a partial list. Entries without a publish or update timestamp are
/// dropped; a feed that omits dates is broken upstream, unlike a sitemap.
pub(crate) async fn discover(
    client: &PageClient,
    site: &SiteDescriptor,
    days_back: i64,
) -> Vec<DiscoveryEntry> {
    let cutoff = Utc::now() - Duration::days(days_back);
    let mut entries: Vec<DiscoveryEntry> = Vec::new();

    for feed_url in &site.feeds {
        let bytes = match client.fetch_bytes(feed_url, site).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(site = %site.name, feed = %feed_url, error = %e, "feed fetch failed");
                continue;
            }
        };

        let feed = match parse_feed(&bytes, feed_url) {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!(site = %site.name, feed = %feed_url, error = %e, "feed parse failed");
                continue;
            }
        };

        entries.extend(entries_from_feed(feed, cutoff));
    }

    dedupe_by_url(entries)
}

/// Parse feed bytes, falling back to a lossy UTF-8 re-decode when the
/// first pass fails. Spanish outlets occasionally declare ISO-8859-1 while
/// serving UTF-8 bytes (or the reverse).
fn parse_feed(bytes: &[u8], feed_url: &str) -> Result<Feed, ScrapeError> {
    match feed_rs::parser::parse(bytes) {
        Ok(feed) => Ok(feed),
        Err(first_err) => {
            tracing::debug!(feed = %feed_url, error = %first_err, "feed parse failed; retrying as forced UTF-8");
            let lossy = String::from_utf8_lossy(bytes);
            feed_rs::parser::parse(lossy.as_bytes()).map_err(|e| ScrapeError::Feed {
                url: feed_url.to_owned(),
                reason: e.to_string(),
            })
        }
    }
}

fn entries_from_feed(feed: Feed, cutoff: DateTime<Utc>) -> Vec<DiscoveryEntry> {
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone())?;
            if link.trim().is_empty() {
                return None;
            }
            let published = entry.published.or(entry.updated)?;
            if published < cutoff {
                return None;
            }
            Some(DiscoveryEntry {
                url: scrub_url(&link),
                published_at: Some(published),
                title: entry.title.map(|t| strip_html(&t.content)).filter(|t| !t.is_empty()),
                summary: entry
                    .summary
                    .map(|s| strip_html(&s.content))
                    .filter(|s| !s.is_empty()),
            })
        })
        .collect()
}

/// Drop tracking query parameters (`utm_*`) and the fragment so the same
/// article reached through different feeds dedupes to one URL.
fn scrub_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !k.starts_with("utm_"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.set_fragment(None);
    url.to_string()
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;

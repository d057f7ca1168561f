//! Sitemap discovery: plain urlsets, Google-News sitemaps, gzip-compressed
//! sitemaps, and sitemap indexes expanded one level deep.

use std::io::Read;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use prensa_core::{DiscoveryEntry, SiteDescriptor};

use crate::client::PageClient;
use crate::error::ScrapeError;
use crate::normalize::try_parse_date;

/// Cap on sub-sitemaps fetched from one sitemap index. Big publishers list
/// hundreds of monthly archives; the freshest ones come first.
const MAX_SUB_SITEMAPS: usize = 5;

/// Date embedded in an article URL path, e.g. `/2026/08/28/`.
static URL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(20\d{2})/(\d{2})/(\d{2})/").expect("valid url date regex"));

/// One `<url>` element of a urlset, before filtering.
#[derive(Debug, Default, Clone)]
struct SitemapUrl {
    loc: String,
    lastmod: Option<String>,
    news_date: Option<String>,
    news_title: Option<String>,
}

/// A parsed sitemap document: either a urlset or an index of sub-sitemaps.
enum SitemapDoc {
    Urls(Vec<SitemapUrl>),
    Index(Vec<String>),
}

/// Collect candidate URLs from every configured sitemap of `site`.
///
/// Never fails: fetch and parse errors are logged per sitemap and degrade
/// to a partial (possibly empty) list.
pub(crate) async fn discover(
    client: &PageClient,
    site: &SiteDescriptor,
    days_back: i64,
) -> Vec<DiscoveryEntry> {
    let cutoff = Utc::now() - Duration::days(days_back);
    let mut entries: Vec<DiscoveryEntry> = Vec::new();

    for sitemap_url in &site.sitemaps {
        let xml = match fetch_document(client, site, sitemap_url).await {
            Ok(Some(xml)) => xml,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(site = %site.name, sitemap = %sitemap_url, error = %e, "sitemap fetch failed");
                continue;
            }
        };

        let doc = match parse_sitemap(&xml) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(site = %site.name, sitemap = %sitemap_url, error = %e, "sitemap parse failed");
                continue;
            }
        };

        match doc {
            SitemapDoc::Urls(urls) => entries.extend(to_entries(urls, cutoff)),
            SitemapDoc::Index(subs) => {
                if subs.len() > MAX_SUB_SITEMAPS {
                    tracing::debug!(
                        site = %site.name,
                        listed = subs.len(),
                        fetched = MAX_SUB_SITEMAPS,
                        "capping sitemap index expansion"
                    );
                }
                for sub_url in subs.iter().take(MAX_SUB_SITEMAPS) {
                    match fetch_document(client, site, sub_url).await {
                        Ok(Some(sub_xml)) => match parse_sitemap(&sub_xml) {
                            Ok(SitemapDoc::Urls(urls)) => entries.extend(to_entries(urls, cutoff)),
                            Ok(SitemapDoc::Index(_)) => {
                                tracing::debug!(site = %site.name, sitemap = %sub_url, "skipping nested sitemap index");
                            }
                            Err(e) => {
                                tracing::warn!(site = %site.name, sitemap = %sub_url, error = %e, "sub-sitemap parse failed");
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!(site = %site.name, sitemap = %sub_url, error = %e, "sub-sitemap fetch failed");
                        }
                    }
                }
            }
        }
    }

    dedupe_by_url(entries)
}

/// Fetch a sitemap body, transparently gunzipping `.gz` URLs. Returns
/// `Ok(None)` when the site opts out of compressed sitemaps.
async fn fetch_document(
    client: &PageClient,
    site: &SiteDescriptor,
    url: &str,
) -> Result<Option<String>, ScrapeError> {
    if url.ends_with(".gz") {
        if site.ignore_gz {
            tracing::debug!(site = %site.name, sitemap = %url, "skipping gzip sitemap per site config");
            return Ok(None);
        }
        let bytes = client.fetch_bytes(url, site).await?;
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut xml = String::new();
        decoder
            .read_to_string(&mut xml)
            .map_err(|e| ScrapeError::Gzip {
                url: url.to_owned(),
                source: e,
            })?;
        return Ok(Some(xml));
    }
    client.fetch_text(url, site).await.map(Some)
}

/// Parse a sitemap document, tolerating namespace prefixes (`news:`,
/// `image:`) by matching on local element names only.
fn parse_sitemap(xml: &str) -> Result<SitemapDoc, ScrapeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls: Vec<SitemapUrl> = Vec::new();
    let mut sub_sitemaps: Vec<String> = Vec::new();
    let mut is_index = false;
    let mut current = SitemapUrl::default();
    let mut in_entry = false;
    let mut in_news = false;
    let mut in_media = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(e.name().as_ref());
                match name.as_str() {
                    "sitemapindex" => is_index = true,
                    "url" | "sitemap" => {
                        in_entry = true;
                        current = SitemapUrl::default();
                    }
                    // news:news wraps publication_date and title; image/video
                    // containers carry their own loc and title elements that
                    // must not clobber the entry's.
                    "news" => in_news = true,
                    "image" | "video" => in_media = true,
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name = local_name(e.name().as_ref());
                match name.as_str() {
                    "news" => in_news = false,
                    "image" | "video" => in_media = false,
                    "url" | "sitemap" if in_entry => {
                        in_entry = false;
                        if !current.loc.is_empty() {
                            if is_index {
                                sub_sitemaps.push(std::mem::take(&mut current.loc));
                            } else {
                                urls.push(std::mem::take(&mut current));
                            }
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "loc" if !in_media => current.loc = text.trim().to_string(),
                        "lastmod" => current.lastmod = Some(text.trim().to_string()),
                        "publication_date" if in_news => {
                            current.news_date = Some(text.trim().to_string());
                        }
                        "title" if in_news => {
                            current.news_title = Some(text.trim().to_string());
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry && !in_media && current_tag == "loc" {
                    current.loc = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScrapeError::Xml(e)),
            _ => {}
        }
    }

    if is_index {
        Ok(SitemapDoc::Index(sub_sitemaps))
    } else {
        Ok(SitemapDoc::Urls(urls))
    }
}

/// Element name with any namespace prefix removed.
fn local_name(raw: &[u8]) -> String {
    let name = std::str::from_utf8(raw).unwrap_or("");
    name.rsplit(':').next().unwrap_or(name).to_string()
}

/// Apply the recency window and convert surviving urls into entries.
///
/// Date preference: `news:publication_date`, then `lastmod`, then a date
/// embedded in the URL path. Entries with no parseable date at all are
/// kept: dropping them would silently blind us to sites whose sitemaps
/// omit dates entirely.
fn to_entries(urls: Vec<SitemapUrl>, cutoff: DateTime<Utc>) -> Vec<DiscoveryEntry> {
    urls.into_iter()
        .filter_map(|u| {
            let date = u
                .news_date
                .as_deref()
                .and_then(try_parse_date)
                .or_else(|| u.lastmod.as_deref().and_then(try_parse_date))
                .or_else(|| date_from_url(&u.loc));
            if let Some(date) = date {
                if date < cutoff {
                    return None;
                }
            }
            Some(DiscoveryEntry {
                url: u.loc,
                published_at: date,
                title: u.news_title.filter(|t| !t.is_empty()),
                summary: None,
            })
        })
        .collect()
}

/// Infer a publish date from a `/YYYY/MM/DD/` path segment.
fn date_from_url(url: &str) -> Option<DateTime<Utc>> {
    let caps = URL_DATE.captures(url)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// First-seen URL dedupe, preserving discovery order.
pub(crate) fn dedupe_by_url(entries: Vec<DiscoveryEntry>) -> Vec<DiscoveryEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.url.clone()))
        .collect()
}

#[cfg(test)]
#[path = "sitemap_test.rs"]
mod tests;

//! Article extraction: fetch one page and assemble an [`ArticleRecord`]
//! from layered sources, most structured first.
//!
//! Layer order per field: JSON-LD, then meta tags, then DOM heuristics,
//! then whatever the discovery entry already knew, then a sentinel.
//! Extraction never fails; a fetch error produces a stub record so the
//! URL stays visible in the export.

pub(crate) mod html;
pub(crate) mod jsonld;
pub(crate) mod meta;

use chrono::Utc;
use scraper::Html;

use prensa_core::{ArticleRecord, DiscoveryEntry, SiteDescriptor, UNTITLED};

use crate::client::PageClient;
use crate::normalize::{clean_authors, clean_text, extract_section, truncate_chars, try_parse_date};

const MAX_KEYWORDS: usize = 10;
const HTML_SNIPPET_CHARS: usize = 500;
const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Fetch `entry.url` and extract a full record. On fetch failure returns a
/// stub record carrying the error, never an `Err`.
pub async fn extract_article(
    client: &PageClient,
    site: &SiteDescriptor,
    entry: &DiscoveryEntry,
) -> ArticleRecord {
    match client.fetch_text(&entry.url, site).await {
        Ok(page) => assemble(site, entry, &page),
        Err(e) => {
            tracing::warn!(site = %site.name, url = %entry.url, error = %e, "article fetch failed");
            ArticleRecord::stub(&entry.url, site, &e.to_string())
        }
    }
}

/// Merge the extraction layers and the discovery metadata into one record.
fn assemble(site: &SiteDescriptor, entry: &DiscoveryEntry, raw_html: &str) -> ArticleRecord {
    let doc = Html::parse_document(raw_html);
    let structured = jsonld::extract(&doc).unwrap_or_default();
    let metas = meta::extract(&doc);
    let dom = html::extract(&doc, site);
    drop(doc);

    let title = if site.prefer_discovery_title && entry.title.is_some() {
        entry.title.clone()
    } else {
        structured
            .headline
            .clone()
            .or_else(|| metas.title.clone())
            .or_else(|| dom.title.clone())
            .or_else(|| entry.title.clone())
    }
    .map(|t| clean_text(&t))
    .filter(|t| !t.is_empty())
    .unwrap_or_else(|| UNTITLED.to_string());

    let publish_date = structured
        .date_published
        .as_deref()
        .and_then(try_parse_date)
        .or_else(|| metas.published.as_deref().and_then(try_parse_date))
        .or(entry.published_at)
        .unwrap_or_else(|| {
            tracing::debug!(url = %entry.url, "no publish date anywhere; using now");
            Utc::now()
        });

    let summary = structured
        .description
        .clone()
        .or_else(|| metas.description.clone())
        .or_else(|| entry.summary.clone())
        .map(|s| clean_text(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| truncate_chars(&dom.text, SUMMARY_FALLBACK_CHARS));

    let mut candidates = structured.authors.clone();
    candidates.extend(metas.authors.clone());
    candidates.extend(dom.bylines.clone());
    let mut authors = clean_authors(&candidates);
    if authors.is_empty() {
        authors.push(site.author_sentinel().to_string());
    }

    let (section, subsection) = extract_section(&entry.url);

    let mut images = structured.images;
    images.extend(metas.image);
    images.extend(dom.images);
    let mut seen = std::collections::HashSet::new();
    images.retain(|i| seen.insert(i.clone()));
    images.truncate(html::MAX_IMAGES);

    let mut keywords = if structured.keywords.is_empty() {
        metas.keywords
    } else {
        structured.keywords
    };
    keywords.truncate(MAX_KEYWORDS);

    ArticleRecord {
        title,
        url: entry.url.clone(),
        publish_date,
        authors,
        source: site.name.clone(),
        domain: site.domain(),
        summary,
        section,
        subsection,
        text: dom.text,
        html_snippet: truncate_chars(raw_html, HTML_SNIPPET_CHARS),
        images,
        keywords,
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

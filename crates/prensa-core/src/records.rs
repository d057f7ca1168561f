use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sites::SiteDescriptor;

/// Title written when a page yields no usable headline.
pub const UNTITLED: &str = "Sin título";
/// Title written on a failed extraction, kept visible in the export.
pub const EXTRACTION_FAILED_TITLE: &str = "Error al extraer el artículo";
/// Section assigned to failed-extraction stub records.
pub const ERROR_SECTION: &str = "error";

/// One normalized article, assembled by the extractor and consumed once by
/// the exporter. Every field is populated before export; optional fields
/// default to empty rather than being omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub publish_date: DateTime<Utc>,
    /// Cleaned human names; never empty — falls back to the site's
    /// newsroom sentinel.
    pub authors: Vec<String>,
    pub source: String,
    pub domain: String,
    pub summary: String,
    pub section: String,
    pub subsection: String,
    /// Full body text when the page yielded one.
    #[serde(default)]
    pub text: String,
    /// Truncated raw-HTML prefix kept for diagnostics only.
    #[serde(default)]
    pub html_snippet: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ArticleRecord {
    /// Stub record for a URL whose extraction failed. The error message is
    /// carried in `summary` so the failure stays visible downstream.
    #[must_use]
    pub fn stub(url: &str, site: &SiteDescriptor, reason: &str) -> Self {
        ArticleRecord {
            title: EXTRACTION_FAILED_TITLE.to_string(),
            url: url.to_string(),
            publish_date: Utc::now(),
            authors: vec!["Error".to_string()],
            source: site.name.clone(),
            domain: site.domain(),
            summary: format!("Error al procesar el artículo: {reason}"),
            section: ERROR_SECTION.to_string(),
            subsection: String::new(),
            text: String::new(),
            html_snippet: String::new(),
            images: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Returns `true` for records produced by [`ArticleRecord::stub`].
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.section == ERROR_SECTION
    }
}

/// A candidate URL produced by a discovery strategy, plus whatever metadata
/// the sitemap or feed already carried. Consumed by the orchestrator, which
/// uses the metadata to backfill extractor gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEntry {
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl DiscoveryEntry {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        DiscoveryEntry {
            url: url.into(),
            published_at: None,
            title: None,
            summary: None,
        }
    }
}

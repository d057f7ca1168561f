use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How candidate article URLs are discovered for a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    /// XML sitemap or Google-News sitemap.
    Sitemap,
    /// RSS/Atom/MRSS feeds.
    Feed,
    /// Homepage link scan.
    Crawl,
}

impl std::fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryMethod::Sitemap => write!(f, "sitemap"),
            DiscoveryMethod::Feed => write!(f, "feed"),
            DiscoveryMethod::Crawl => write!(f, "crawl"),
        }
    }
}

/// Static configuration for one publisher site. Loaded once at startup from
/// `config/sites.yaml` and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub base_url: String,
    pub method: DiscoveryMethod,
    /// Tried once when the primary method yields zero URLs.
    #[serde(default)]
    pub fallback_method: Option<DiscoveryMethod>,
    #[serde(default)]
    pub sitemaps: Vec<String>,
    #[serde(default)]
    pub feeds: Vec<String>,
    /// Entry point for the crawl strategy; defaults to `base_url`.
    #[serde(default)]
    pub crawl_url: Option<String>,
    /// Extra request headers sent for every fetch against this site.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Fixed User-Agent override; when absent one is rotated from the pool.
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub max_articles: Option<usize>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Skip `.gz` sitemap entries instead of decompressing them.
    #[serde(default)]
    pub ignore_gz: bool,
    /// Sitemaps carry the Google-News namespace (`news:publication_date`).
    #[serde(default)]
    pub news_sitemap: bool,
    /// Byline sentinel when no author survives cleaning. Spanish outlets
    /// conventionally credit the newsroom as "Redacción".
    #[serde(default)]
    pub default_author: Option<String>,
    /// Site-specific byline CSS selectors, tried before the generic list.
    #[serde(default)]
    pub byline_selectors: Vec<String>,
    /// Treat the sitemap/feed title as authoritative over the extractor's.
    #[serde(default)]
    pub prefer_discovery_title: bool,
}

impl SiteDescriptor {
    /// Generate a URL-safe slug from the site name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Hostname of `base_url`, or the raw string when it does not parse.
    #[must_use]
    pub fn domain(&self) -> String {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_else(|| self.base_url.clone())
    }

    /// Author sentinel used when cleaning leaves the byline empty.
    #[must_use]
    pub fn author_sentinel(&self) -> &str {
        self.default_author.as_deref().unwrap_or("Redacción")
    }

    /// Returns `true` if the site carries the source list `method` needs.
    #[must_use]
    pub fn supports(&self, method: DiscoveryMethod) -> bool {
        match method {
            DiscoveryMethod::Sitemap => !self.sitemaps.is_empty(),
            DiscoveryMethod::Feed => !self.feeds.is_empty(),
            DiscoveryMethod::Crawl => true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SitesFile {
    pub sites: Vec<SiteDescriptor>,
}

/// Load and validate the site registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sites_file: SitesFile = serde_yaml::from_str(&content)?;

    validate_sites(&sites_file)?;

    Ok(sites_file)
}

fn validate_sites(sites_file: &SitesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for site in &sites_file.sites {
        if site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name must be non-empty".to_string(),
            ));
        }

        if url::Url::parse(&site.base_url).is_err() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has unparseable base_url '{}'",
                site.name, site.base_url
            )));
        }

        if !site.supports(site.method) {
            return Err(ConfigError::Validation(format!(
                "site '{}' uses {} discovery but configures no {} source",
                site.name, site.method, site.method
            )));
        }

        if let Some(fallback) = site.fallback_method {
            if fallback == site.method {
                return Err(ConfigError::Validation(format!(
                    "site '{}' falls back to its own primary method {}",
                    site.name, fallback
                )));
            }
            if !site.supports(fallback) {
                return Err(ConfigError::Validation(format!(
                    "site '{}' falls back to {} but configures no {} source",
                    site.name, fallback, fallback
                )));
            }
        }

        if site.max_articles == Some(0) {
            return Err(ConfigError::Validation(format!(
                "site '{}' sets max_articles to 0; omit the field instead",
                site.name
            )));
        }

        let lower_name = site.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name: '{}'",
                site.name
            )));
        }

        let slug = site.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site slug: '{}' (from site '{}')",
                slug, site.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;

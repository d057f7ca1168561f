//! Article-URL discovery: three interchangeable strategies plus dispatch.
//!
//! Strategies share one contract: given a site and a recency window they
//! return a candidate list, never an error. Everything that can go wrong
//! is logged internally and degrades to a partial or empty list.

pub(crate) mod crawl;
pub(crate) mod feed;
pub(crate) mod sitemap;

use prensa_core::{DiscoveryEntry, DiscoveryMethod, SiteDescriptor};

use crate::client::PageClient;

/// Run the site's primary discovery method; when it yields nothing and a
/// fallback method is configured, try the fallback exactly once.
pub async fn discover(
    client: &PageClient,
    site: &SiteDescriptor,
    days_back: i64,
) -> Vec<DiscoveryEntry> {
    let entries = run_method(client, site, site.method, days_back).await;
    if !entries.is_empty() {
        return entries;
    }

    let Some(fallback) = site.fallback_method else {
        return entries;
    };
    tracing::warn!(
        site = %site.name,
        primary = %site.method,
        fallback = %fallback,
        "primary discovery yielded nothing; trying fallback"
    );
    run_method(client, site, fallback, days_back).await
}

async fn run_method(
    client: &PageClient,
    site: &SiteDescriptor,
    method: DiscoveryMethod,
    days_back: i64,
) -> Vec<DiscoveryEntry> {
    let entries = match method {
        DiscoveryMethod::Sitemap => sitemap::discover(client, site, days_back).await,
        DiscoveryMethod::Feed => feed::discover(client, site, days_back).await,
        DiscoveryMethod::Crawl => crawl::discover(client, site, days_back).await,
    };
    tracing::info!(site = %site.name, method = %method, candidates = entries.len(), "discovery finished");
    entries
}

//! Per-site pipeline: discover, dedupe, cap, extract each URL with isolated
//! failure handling.

use rand::Rng;

use prensa_core::{AppConfig, ArticleRecord, SiteDescriptor};

use crate::client::PageClient;
use crate::discover;
use crate::extract;

/// Run one site's full pipeline and return its records.
///
/// Never fails: discovery degrades to an empty list and a failed extraction
/// becomes a stub record, so the output length always matches the number of
/// candidate URLs processed.
pub async fn run_site(
    client: &PageClient,
    site: &SiteDescriptor,
    config: &AppConfig,
) -> Vec<ArticleRecord> {
    let entries = discover::discover(client, site, config.days_back).await;
    let cap = site.max_articles.unwrap_or(config.max_articles);
    let total = entries.len();
    if total > cap {
        tracing::info!(site = %site.name, candidates = total, cap, "capping candidate list");
    }

    let mut records = Vec::with_capacity(total.min(cap));
    for (i, entry) in entries.into_iter().take(cap).enumerate() {
        if i > 0 {
            politeness_delay(config.inter_request_delay_ms).await;
        }
        records.push(extract::extract_article(client, site, &entry).await);
    }

    let stubs = records.iter().filter(|r| r.is_stub()).count();
    tracing::info!(
        site = %site.name,
        articles = records.len(),
        stubs,
        "site pipeline finished"
    );
    records
}

/// Randomized sleep between article fetches so a run does not hammer one
/// host at full speed.
async fn politeness_delay((min_ms, max_ms): (u64, u64)) {
    let delay_ms = if min_ms >= max_ms {
        min_ms
    } else {
        rand::rng().random_range(min_ms..=max_ms)
    };
    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
}

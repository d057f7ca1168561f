//! Batch driver: run every selected site's pipeline with bounded
//! concurrency and collect a per-site outcome summary.
//!
//! One site failing (client construction, export I/O) never aborts the
//! batch; the failure is recorded and the rest keep running.

use std::path::PathBuf;

use futures::stream::{self, StreamExt};

use prensa_core::{AppConfig, SiteDescriptor};

use crate::client::PageClient;
use crate::error::ScrapeError;
use crate::export;
use crate::pipeline;

/// Outcome of one site that completed its pipeline.
#[derive(Debug)]
pub struct SiteExport {
    pub site: String,
    pub articles: usize,
    /// Records that are extraction-failure stubs.
    pub stubs: usize,
    /// `None` when discovery found nothing; no file is written then.
    pub path: Option<PathBuf>,
}

/// A site whose run failed outright.
#[derive(Debug)]
pub struct SiteFailure {
    pub site: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub successes: Vec<SiteExport>,
    pub failures: Vec<SiteFailure>,
}

impl BatchSummary {
    /// `true` when every selected site failed. The process exit code keys
    /// off this, not off individual failures.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.successes.is_empty() && !self.failures.is_empty()
    }

    #[must_use]
    pub fn total_articles(&self) -> usize {
        self.successes.iter().map(|s| s.articles).sum()
    }
}

/// Run all `sites` with at most `config.max_concurrent_sites` pipelines in
/// flight at once.
pub async fn run_all(config: &AppConfig, sites: &[SiteDescriptor]) -> BatchSummary {
    let concurrency = config.max_concurrent_sites.max(1);
    let outcomes: Vec<(String, Result<SiteExport, ScrapeError>)> = stream::iter(sites)
        .map(|site| async move { (site.name.clone(), run_one(config, site).await) })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut summary = BatchSummary::default();
    for (site, outcome) in outcomes {
        match outcome {
            Ok(result) => summary.successes.push(result),
            Err(e) => {
                tracing::error!(site = %site, error = %e, "site run failed");
                summary.failures.push(SiteFailure {
                    site,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        sites = sites.len(),
        succeeded = summary.successes.len(),
        failed = summary.failures.len(),
        articles = summary.total_articles(),
        "batch finished"
    );
    summary
}

async fn run_one(config: &AppConfig, site: &SiteDescriptor) -> Result<SiteExport, ScrapeError> {
    let client = PageClient::for_site(config, site)?;
    let records = pipeline::run_site(&client, site, config).await;
    let stubs = records.iter().filter(|r| r.is_stub()).count();

    // Empty discovery is a quiet day, not an error. No file either way.
    let path = if records.is_empty() {
        tracing::info!(site = %site.name, "no articles discovered; skipping export");
        None
    } else {
        Some(export::export(&records, site, &config.output_dir)?)
    };

    Ok(SiteExport {
        site: site.name.clone(),
        articles: records.len(),
        stubs,
        path,
    })
}

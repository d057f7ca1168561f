//! Command handlers for the CLI.
//!
//! A single failing site is reported and skipped rather than aborting the
//! batch; the process exits non-zero only when every selected site failed.

use std::path::PathBuf;

use prensa_core::{load_sites, AppConfig, SiteDescriptor};

#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub max_articles: Option<usize>,
    pub days_back: Option<i64>,
    pub out_dir: Option<PathBuf>,
}

/// Run the collection pipeline for the selected sites and print a
/// per-site summary.
///
/// # Errors
///
/// Returns an error when the registry cannot be loaded, a `--site` filter
/// matches nothing, or every selected site fails its run.
pub(crate) async fn run_collect(
    mut config: AppConfig,
    site_filter: &[String],
    overrides: Overrides,
) -> anyhow::Result<()> {
    let registry = load_sites(&config.sites_path)?;
    let sites = select_sites(registry.sites, site_filter)?;

    if let Some(max_articles) = overrides.max_articles {
        config.max_articles = max_articles;
    }
    if let Some(days_back) = overrides.days_back {
        config.days_back = days_back;
    }
    if let Some(out_dir) = overrides.out_dir {
        config.output_dir = out_dir;
    }

    tracing::info!(
        sites = sites.len(),
        days_back = config.days_back,
        out_dir = %config.output_dir.display(),
        "starting collection run"
    );

    let summary = prensa_scraper::run_all(&config, &sites).await;

    for success in &summary.successes {
        match &success.path {
            Some(path) => println!(
                "{}: {} articles ({} failed extractions) -> {}",
                success.site,
                success.articles,
                success.stubs,
                path.display()
            ),
            None => println!("{}: no articles discovered", success.site),
        }
    }
    for failure in &summary.failures {
        eprintln!("error: {}: {}", failure.site, failure.error);
    }
    println!(
        "done: {} articles across {} sites ({} failed)",
        summary.total_articles(),
        summary.successes.len(),
        summary.failures.len()
    );

    if summary.all_failed() {
        anyhow::bail!("all {} selected sites failed", summary.failures.len());
    }
    Ok(())
}

/// Print the site registry.
pub(crate) fn list_sites(config: &AppConfig) -> anyhow::Result<()> {
    let registry = load_sites(&config.sites_path)?;
    for site in &registry.sites {
        let fallback = site
            .fallback_method
            .map(|m| format!(" (fallback: {m})"))
            .unwrap_or_default();
        println!(
            "{:<20} {:<10} {}{fallback}",
            site.slug(),
            site.method.to_string(),
            site.base_url
        );
    }
    println!("{} sites configured", registry.sites.len());
    Ok(())
}

/// Keep the sites matching `filter` (by name or slug, case-insensitive);
/// an empty filter selects everything. Unknown names are an error so a
/// typo does not silently collect nothing.
fn select_sites(
    all: Vec<SiteDescriptor>,
    filter: &[String],
) -> anyhow::Result<Vec<SiteDescriptor>> {
    if filter.is_empty() {
        return Ok(all);
    }

    let mut selected = Vec::new();
    for wanted in filter {
        let wanted_lower = wanted.to_lowercase();
        let found = all
            .iter()
            .find(|s| s.name.to_lowercase() == wanted_lower || s.slug() == wanted_lower);
        match found {
            Some(site) => selected.push(site.clone()),
            None => anyhow::bail!("unknown site: '{wanted}' (try the `sites` command)"),
        }
    }
    Ok(selected)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;

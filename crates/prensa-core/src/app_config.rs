use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level configuration for a collection run, loaded from `PRENSA_*`
/// environment variables. Per-site settings live in `config/sites.yaml`
/// ([`crate::sites`]); this struct holds only the dials shared by every site.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Path to the site registry YAML.
    pub sites_path: PathBuf,
    /// Directory the exporter writes per-site CSV files into.
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    /// How many sites run their pipelines at once.
    pub max_concurrent_sites: usize,
    /// Default cap on processed URLs per site; a site's own `max_articles`
    /// takes precedence.
    pub max_articles: usize,
    /// Discovery recency window in days.
    pub days_back: i64,
    /// Bounds of the randomized politeness delay between article fetches.
    pub inter_request_delay_ms: (u64, u64),
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

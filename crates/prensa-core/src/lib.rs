//! Configuration and domain types shared across the prensa workspace.

pub mod app_config;
pub mod config;
pub mod records;
pub mod sites;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{ArticleRecord, DiscoveryEntry, ERROR_SECTION, EXTRACTION_FAILED_TITLE, UNTITLED};
pub use sites::{load_sites, DiscoveryMethod, SiteDescriptor, SitesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sites file {path}: {source}")]
    SitesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sites file: {0}")]
    SitesFileParse(#[from] serde_yaml::Error),

    #[error("sites file validation failed: {0}")]
    Validation(String),
}

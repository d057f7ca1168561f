use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;

#[derive(Debug, Parser)]
#[command(name = "prensa")]
#[command(about = "Collects articles from Spanish news sites into daily CSV exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the collection pipeline and export per-site CSV files.
    Run {
        /// Only collect the named sites (name or slug, repeatable).
        #[arg(long = "site")]
        sites: Vec<String>,
        /// Override the per-site article cap.
        #[arg(long)]
        max_articles: Option<usize>,
        /// Override the discovery recency window in days.
        #[arg(long)]
        days_back: Option<i64>,
        /// Override the export directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List the configured sites and their discovery methods.
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = prensa_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            sites,
            max_articles,
            days_back,
            out_dir,
        } => {
            run::run_collect(
                config,
                &sites,
                run::Overrides {
                    max_articles,
                    days_back,
                    out_dir,
                },
            )
            .await
        }
        Commands::Sites => run::list_sites(&config),
    }
}

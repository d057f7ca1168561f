pub mod batch;
pub mod client;
pub mod discover;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod pipeline;
mod retry;

pub use batch::{run_all, BatchSummary, SiteExport, SiteFailure};
pub use client::PageClient;
pub use error::ScrapeError;
pub use export::export;
pub use pipeline::run_site;

//! Flat-file export: one caret-delimited CSV per site per calendar day.
//!
//! Titles and summaries routinely contain commas, so the delimiter is
//! `^`. Files start with a UTF-8 BOM for spreadsheet compatibility; a
//! same-day re-run appends rows without repeating the header.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use unicode_normalization::UnicodeNormalization;

use prensa_core::{ArticleRecord, SiteDescriptor};

use crate::error::ScrapeError;
use crate::normalize::clean_text;

pub const DELIMITER: u8 = b'^';
const BOM: &[u8] = b"\xef\xbb\xbf";
const AUTHOR_SEPARATOR: &str = ", ";

/// Fixed column order. A stub record still populates every column.
pub const COLUMNS: [&str; 9] = [
    "title",
    "url",
    "publish_date",
    "authors",
    "source",
    "domain",
    "summary",
    "section",
    "subsection",
];

/// Write `records` for `site` under `out_dir`, appending when today's file
/// already exists. Returns the file path.
///
/// # Errors
///
/// Returns [`ScrapeError::Io`] or [`ScrapeError::Csv`] on write failure.
/// Export failure is fatal for the site's run, not for the batch.
pub fn export(
    records: &[ArticleRecord],
    site: &SiteDescriptor,
    out_dir: &Path,
) -> Result<PathBuf, ScrapeError> {
    let path = output_path(site, out_dir);
    let dir = path.parent().unwrap_or(out_dir);
    std::fs::create_dir_all(dir).map_err(|e| ScrapeError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let existing_len = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let is_new = existing_len == 0;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ScrapeError::Io {
            path: path.clone(),
            source: e,
        })?;

    if is_new {
        file.write_all(BOM).map_err(|e| ScrapeError::Io {
            path: path.clone(),
            source: e,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush().map_err(|e| ScrapeError::Io {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(
        site = %site.name,
        rows = records.len(),
        path = %path.display(),
        appended = !is_new,
        "export finished"
    );
    Ok(path)
}

/// `<out_dir>/<slug>/<slug>_articles_<yyyymmdd>.csv`, keyed by today.
pub fn output_path(site: &SiteDescriptor, out_dir: &Path) -> PathBuf {
    let slug = site.slug();
    let date = Utc::now().format("%Y%m%d");
    out_dir.join(&slug).join(format!("{slug}_articles_{date}.csv"))
}

fn row(record: &ArticleRecord) -> [String; 9] {
    [
        sanitize(&record.title),
        sanitize(&record.url),
        record.publish_date.to_rfc3339(),
        sanitize(&record.authors.join(AUTHOR_SEPARATOR)),
        sanitize(&record.source),
        sanitize(&record.domain),
        sanitize(&record.summary),
        sanitize(&record.section),
        sanitize(&record.subsection),
    ]
}

/// Compose to NFC, drop control characters and the delimiter itself,
/// collapse whitespace. Keeps accented characters intact.
fn sanitize(field: &str) -> String {
    let composed: String = field
        .nfc()
        .filter(|c| !c.is_control() && *c != DELIMITER as char)
        .collect();
    clean_text(&composed)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

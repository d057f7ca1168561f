use std::path::PathBuf;

use chrono::Utc;

use prensa_core::{ArticleRecord, DiscoveryMethod, SiteDescriptor};

use super::{export, output_path, sanitize, COLUMNS};

fn site() -> SiteDescriptor {
    SiteDescriptor {
        name: "El País".to_string(),
        base_url: "https://elpais.com".to_string(),
        method: DiscoveryMethod::Feed,
        fallback_method: None,
        sitemaps: vec![],
        feeds: vec!["https://elpais.com/rss".to_string()],
        crawl_url: None,
        headers: std::collections::BTreeMap::new(),
        user_agent: None,
        max_articles: None,
        request_timeout_secs: None,
        ignore_gz: false,
        news_sitemap: false,
        default_author: None,
        byline_selectors: vec![],
        prefer_discovery_title: false,
    }
}

fn record(url: &str, title: &str) -> ArticleRecord {
    ArticleRecord {
        title: title.to_string(),
        url: url.to_string(),
        publish_date: Utc::now(),
        authors: vec!["Juan García".to_string(), "Ana Ruiz".to_string()],
        source: "El País".to_string(),
        domain: "elpais.com".to_string(),
        summary: "Resumen, con comas.".to_string(),
        section: "Politica".to_string(),
        subsection: String::new(),
        text: String::new(),
        html_snippet: String::new(),
        images: vec![],
        keywords: vec![],
    }
}

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "prensa-export-{label}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    text.lines()
        .map(|l| l.split('^').map(str::to_string).collect())
        .collect()
}

#[test]
fn round_trip_yields_header_plus_n_rows() {
    let dir = scratch_dir("roundtrip");
    let records = vec![
        record("https://elpais.com/a", "Titular uno"),
        record("https://elpais.com/b", "Titular dos"),
    ];
    let path = export(&records, &site(), &dir).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], COLUMNS.map(str::to_string).to_vec());
    assert_eq!(rows[1][0], "Titular uno");
    assert_eq!(rows[1][3], "Juan García, Ana Ruiz");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn same_day_rerun_appends_without_second_header() {
    let dir = scratch_dir("append");
    let s = site();
    export(&[record("https://elpais.com/a", "Primero")], &s, &dir).unwrap();
    let path = export(&[record("https://elpais.com/b", "Segundo")], &s, &dir).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "title");
    assert_eq!(rows[1][0], "Primero");
    assert_eq!(rows[2][0], "Segundo");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_starts_with_utf8_bom() {
    let dir = scratch_dir("bom");
    let path = export(&[record("https://elpais.com/a", "Título")], &site(), &dir).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..3], b"\xef\xbb\xbf");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn output_path_is_keyed_by_slug_and_day() {
    let path = output_path(&site(), std::path::Path::new("/tmp/out"));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("el-pas_articles_"));
    assert!(name.ends_with(".csv"));
    assert!(path.starts_with("/tmp/out/el-pas"));
}

#[test]
fn sanitize_strips_controls_and_the_delimiter() {
    assert_eq!(sanitize("uno\ndos\ttres"), "uno dos tres");
    assert_eq!(sanitize("a^b"), "ab");
    assert_eq!(sanitize("acentuación"), "acentuación");
}

#[test]
fn stub_records_export_with_every_column_populated() {
    let dir = scratch_dir("stub");
    let stub = ArticleRecord::stub("https://elpais.com/x", &site(), "timed out");
    let path = export(&[stub], &site(), &dir).unwrap();
    let rows = read_rows(&path);
    assert_eq!(rows[1].len(), COLUMNS.len());
    assert_eq!(rows[1][7], "error");
    std::fs::remove_dir_all(&dir).unwrap();
}

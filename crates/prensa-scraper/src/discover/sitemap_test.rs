use chrono::{Duration, TimeZone, Utc};

use prensa_core::DiscoveryEntry;

use super::{date_from_url, dedupe_by_url, parse_sitemap, to_entries, SitemapDoc, SitemapUrl};

fn urlset(body: &str) -> Vec<SitemapUrl> {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">{body}</urlset>"#
    );
    match parse_sitemap(&xml).unwrap() {
        SitemapDoc::Urls(urls) => urls,
        SitemapDoc::Index(_) => panic!("expected urlset"),
    }
}

#[test]
fn parses_plain_urlset_with_lastmod() {
    let urls = urlset(
        r"<url><loc>https://example.com/economia/empleo</loc><lastmod>2026-08-28T10:00:00+00:00</lastmod></url>",
    );
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].loc, "https://example.com/economia/empleo");
    assert_eq!(urls[0].lastmod.as_deref(), Some("2026-08-28T10:00:00+00:00"));
    assert!(urls[0].news_date.is_none());
}

#[test]
fn parses_news_namespace_date_and_title() {
    let urls = urlset(
        r"<url>
            <loc>https://example.com/politica/elecciones</loc>
            <news:news>
              <news:publication_date>2026-08-28T09:30:00Z</news:publication_date>
              <news:title>Elecciones anticipadas</news:title>
            </news:news>
          </url>",
    );
    assert_eq!(urls[0].news_date.as_deref(), Some("2026-08-28T09:30:00Z"));
    assert_eq!(urls[0].news_title.as_deref(), Some("Elecciones anticipadas"));
}

#[test]
fn parses_sitemap_index_into_sub_sitemap_list() {
    let xml = r#"<?xml version="1.0"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-2026-08.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-2026-07.xml</loc></sitemap>
</sitemapindex>"#;
    match parse_sitemap(xml).unwrap() {
        SitemapDoc::Index(subs) => {
            assert_eq!(subs.len(), 2);
            assert_eq!(subs[0], "https://example.com/sitemap-2026-08.xml");
        }
        SitemapDoc::Urls(_) => panic!("expected index"),
    }
}

#[test]
fn image_and_video_children_do_not_clobber_the_entry() {
    let urls = urlset(
        r"<url>
            <loc>https://example.com/deportes/final</loc>
            <image:image><image:loc>https://example.com/foto.jpg</image:loc></image:image>
            <video:video><video:title>Resumen en vídeo</video:title></video:video>
          </url>",
    );
    assert_eq!(urls[0].loc, "https://example.com/deportes/final");
    assert!(urls[0].news_title.is_none());
}

#[test]
fn skips_entries_without_loc() {
    let urls = urlset(r"<url><lastmod>2026-08-28</lastmod></url>");
    assert!(urls.is_empty());
}

#[test]
fn rejects_malformed_xml() {
    assert!(parse_sitemap("<urlset><url><loc>x</url>").is_err());
}

#[test]
fn age_filter_drops_old_and_keeps_recent() {
    let cutoff = Utc::now() - Duration::days(1);
    let urls = vec![
        SitemapUrl {
            loc: "https://example.com/viejo".to_string(),
            lastmod: Some((Utc::now() - Duration::days(10)).to_rfc3339()),
            ..SitemapUrl::default()
        },
        SitemapUrl {
            loc: "https://example.com/reciente".to_string(),
            lastmod: Some(Utc::now().to_rfc3339()),
            ..SitemapUrl::default()
        },
    ];
    let entries = to_entries(urls, cutoff);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, "https://example.com/reciente");
}

#[test]
fn wide_window_keeps_old_entries() {
    let cutoff = Utc::now() - Duration::days(30);
    let urls = vec![SitemapUrl {
        loc: "https://example.com/viejo".to_string(),
        lastmod: Some((Utc::now() - Duration::days(10)).to_rfc3339()),
        ..SitemapUrl::default()
    }];
    assert_eq!(to_entries(urls, cutoff).len(), 1);
}

#[test]
fn undated_entries_are_kept() {
    let cutoff = Utc::now() - Duration::days(1);
    let urls = vec![SitemapUrl {
        loc: "https://example.com/sin-fecha".to_string(),
        ..SitemapUrl::default()
    }];
    let entries = to_entries(urls, cutoff);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].published_at.is_none());
}

#[test]
fn news_date_wins_over_lastmod() {
    let cutoff = Utc::now() - Duration::days(365);
    let urls = vec![SitemapUrl {
        loc: "https://example.com/x".to_string(),
        lastmod: Some("2026-08-01T00:00:00Z".to_string()),
        news_date: Some("2026-08-28T12:00:00Z".to_string()),
        ..SitemapUrl::default()
    }];
    let entries = to_entries(urls, cutoff);
    assert_eq!(
        entries[0].published_at,
        Some(Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap())
    );
}

#[test]
fn url_path_date_is_last_resort() {
    let got = date_from_url("https://example.com/2026/08/28/titular-del-dia.html").unwrap();
    assert_eq!(got, Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 0).unwrap());
    assert!(date_from_url("https://example.com/economia/titular").is_none());
}

#[test]
fn dedupe_keeps_first_occurrence() {
    let entries = vec![
        DiscoveryEntry::new("https://example.com/a"),
        DiscoveryEntry::new("https://example.com/b"),
        DiscoveryEntry::new("https://example.com/a"),
    ];
    let deduped = dedupe_by_url(entries);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].url, "https://example.com/a");
}

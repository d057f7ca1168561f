use chrono::{Datelike, TimeZone, Timelike, Utc};

use super::{
    clean_authors, clean_text, extract_section, parse_date, strip_html, truncate_chars,
    try_parse_date,
};

#[test]
fn clean_text_collapses_whitespace_runs() {
    assert_eq!(clean_text("  hola \n\t mundo  "), "hola mundo");
}

#[test]
fn clean_text_is_idempotent() {
    let once = clean_text("a \n b\tc");
    assert_eq!(clean_text(&once), once);
}

#[test]
fn clean_text_empty_maps_to_empty() {
    assert_eq!(clean_text(""), "");
    assert_eq!(clean_text("   \n "), "");
}

#[test]
fn clean_authors_keeps_names_and_drops_boilerplate() {
    let raw = [
        "Por Juan García".to_string(),
        "Redacción".to_string(),
        "3 min de lectura".to_string(),
    ];
    assert_eq!(clean_authors(&raw), vec!["Juan García"]);
}

#[test]
fn clean_authors_drops_social_and_date_fragments() {
    let raw = [
        "Compartir en Twitter".to_string(),
        "28/08/2026".to_string(),
        "12:45".to_string(),
        "María López Fernández".to_string(),
    ];
    assert_eq!(clean_authors(&raw), vec!["María López Fernández"]);
}

#[test]
fn clean_authors_rejects_single_tokens_and_overlong_strings() {
    let raw = [
        "Juan".to_string(),
        "a".repeat(60),
        "Ana Belén Ruiz".to_string(),
    ];
    assert_eq!(clean_authors(&raw), vec!["Ana Belén Ruiz"]);
}

#[test]
fn clean_authors_length_limit_counts_characters_not_bytes() {
    // 49 characters, but 54 bytes once the accents are UTF-8 encoded.
    let raw = ["Mariángeles Villahermosa Santibáñez Echevarría Ú.".to_string()];
    assert_eq!(
        clean_authors(&raw),
        vec!["Mariángeles Villahermosa Santibáñez Echevarría Ú"]
    );
}

#[test]
fn clean_authors_dedupes_repeats_across_sources() {
    // The same byline often shows up in JSON-LD, meta tags, and the DOM.
    let raw = [
        "Juan García".to_string(),
        "Por Juan García".to_string(),
        "Juan García".to_string(),
    ];
    assert_eq!(clean_authors(&raw), vec!["Juan García"]);
}

#[test]
fn clean_authors_trims_edge_punctuation() {
    let raw = ["| Laura Pérez ,".to_string()];
    assert_eq!(clean_authors(&raw), vec!["Laura Pérez"]);
}

#[test]
fn clean_authors_empty_input_yields_empty() {
    let raw: [String; 0] = [];
    assert!(clean_authors(&raw).is_empty());
}

#[test]
fn try_parse_date_handles_rfc3339() {
    let dt = try_parse_date("2026-08-28T10:30:00+02:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 28, 8, 30, 0).unwrap());
}

#[test]
fn try_parse_date_handles_rfc3339_zulu() {
    let dt = try_parse_date("2025-06-26T16:31:36Z").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 26, 16, 31, 36).unwrap());
}

#[test]
fn try_parse_date_handles_rfc2822_feed_dates() {
    let dt = try_parse_date("Fri, 28 Aug 2026 10:30:00 GMT").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 28, 10, 30, 0).unwrap());
}

#[test]
fn try_parse_date_assumes_utc_for_naive_timestamps() {
    let dt = try_parse_date("2026-08-28T10:30:00").unwrap();
    assert_eq!(dt.hour(), 10);
    assert_eq!(dt.timezone(), Utc);
}

#[test]
fn try_parse_date_handles_bare_dates() {
    let dt = try_parse_date("2026-08-28").unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day()), (2026, 8, 28));
    assert_eq!((dt.hour(), dt.minute()), (0, 0));
}

#[test]
fn try_parse_date_rejects_garbage() {
    assert!(try_parse_date("ayer por la tarde").is_none());
    assert!(try_parse_date("").is_none());
}

#[test]
fn parse_date_falls_back_to_now_on_garbage() {
    let before = Utc::now();
    let parsed = parse_date("no es una fecha");
    assert!(parsed >= before);
    assert!(parsed <= Utc::now());
}

#[test]
fn extract_section_picks_meaningful_segments() {
    let (section, subsection) =
        extract_section("https://example.com/es/tecnologia/articulo-sobre-ia-12345");
    assert_eq!(section, "Tecnologia");
    assert_eq!(subsection, "Articulo Sobre Ia");
}

#[test]
fn extract_section_skips_dates_and_short_segments() {
    let (section, subsection) =
        extract_section("https://example.com/2026/08/28/economia/empleo-sube.html");
    assert_eq!(section, "Economia");
    assert_eq!(subsection, "Empleo Sube.html");
}

#[test]
fn extract_section_defaults_to_general() {
    let (section, subsection) = extract_section("https://example.com/");
    assert_eq!(section, "general");
    assert_eq!(subsection, "");
}

#[test]
fn extract_section_title_cases_hyphenated_segments() {
    let (section, _) = extract_section("https://example.com/clima-y-medio-ambiente/x-y-z");
    assert_eq!(section, "Clima Y Medio Ambiente");
}

#[test]
fn strip_html_removes_tags_and_collapses_whitespace() {
    assert_eq!(
        strip_html("<p>El <b>Gobierno</b> aprueba\n la medida</p>"),
        "El Gobierno aprueba la medida"
    );
}

#[test]
fn truncate_chars_respects_multibyte_boundaries() {
    assert_eq!(truncate_chars("añáguila", 3), "añá");
    assert_eq!(truncate_chars("corto", 500), "corto");
}

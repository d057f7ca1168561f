//! Field cleanup shared by every discovery strategy and the extractor.
//!
//! All functions here are pure and deterministic apart from
//! [`parse_date`]'s now-fallback. Upstream bylines and dates arrive in
//! wildly inconsistent shapes, so the cleaners are deliberately defensive:
//! reject loudly, default quietly.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// Upper bound on a plausible personal-name byline.
const MAX_AUTHOR_LEN: usize = 50;

/// Byline prefixes stripped before name matching ("Por Juan García").
static BYLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:por|de)\s+").expect("valid byline prefix regex"));

/// Candidate strings matching any of these are not personal names:
/// newsroom/agency credits, social-share boilerplate, reading-time
/// annotations, date/time fragments, and strings with no letters at all.
static AUTHOR_EXCLUSIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:redacci[oó]n|equipo|staff|editorial|edici[oó]n|nota de prensa|comunicado|agencias?|efe)\b",
        r"(?i)\b(?:compartir|twitter|facebook|instagram|whatsapp|telegram|email|correo|contacto|comentarios?|comentar)\b",
        r"(?i)\b(?:seguir leyendo|ver m[aá]s|noticias relacionadas|m[aá]s en)\b",
        r"(?i)\b\d+\s*min(?:utos?)?\b",
        r"(?i)\bde lectura\b",
        r"\b\d+/\d+/\d+\b",
        r"\b\d+:\d+\b",
        r"^[\W\d\s]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid author exclusion regex"))
    .collect()
});

/// A plausible personal name: 2-4 capitalized word tokens, accented
/// Spanish letters included, with an optional trailing initial.
static AUTHOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-ZÁÉÍÓÚÜÑ][a-záéíóúüñ']+(?:\s+[A-ZÁÉÍÓÚÜÑ][a-záéíóúüñ']+){1,3}(?:\s+[A-ZÁÉÍÓÚÜÑ]\.?)?$",
    )
    .expect("valid author name regex")
});

/// Path segments that never describe a section.
const SECTION_STOPLIST: [&str; 10] = [
    "www",
    "http",
    "https",
    "com",
    "es",
    "noticias",
    "actualidad",
    "ultimas-noticias",
    "articulo",
    "noticia",
];

/// Collapses all whitespace runs (newlines and tabs included) to single
/// spaces and trims. Idempotent; the empty string maps to itself.
#[must_use]
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Filters raw byline candidates down to actual personal names.
///
/// Each candidate is prefix-stripped ("Por ..."), length-checked, matched
/// against the exclusion set, then required to look like a personal name.
/// Survivors are whitespace-normalized, edge-punctuation-trimmed, and
/// deduplicated case-insensitively in first-seen order.
///
/// May return an empty list — callers substitute the site's newsroom
/// sentinel, never drop the field.
#[must_use]
pub fn clean_authors<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();

    for candidate in raw {
        let candidate = clean_text(candidate.as_ref());
        if candidate.is_empty() || candidate.chars().count() > MAX_AUTHOR_LEN {
            continue;
        }

        let stripped = BYLINE_PREFIX.replace(&candidate, "").to_string();

        if AUTHOR_EXCLUSIONS.iter().any(|re| re.is_match(&stripped)) {
            tracing::debug!(candidate = %stripped, "byline candidate matched exclusion");
            continue;
        }

        let trimmed = stripped
            .trim_matches([' ', ',', '.', '-', '_', '|'])
            .to_string();

        if !AUTHOR_NAME.is_match(&trimmed) {
            tracing::debug!(candidate = %trimmed, "byline candidate is not a personal name");
            continue;
        }

        if trimmed.chars().count() < 3 || trimmed.split_whitespace().count() < 2 {
            continue;
        }

        let lower = trimmed.to_lowercase();
        if !cleaned.iter().any(|a| a.to_lowercase() == lower) {
            cleaned.push(trimmed);
        }
    }

    cleaned
}

/// Strict date parsing: ISO-8601 with offset, RFC-822 (feed `pubDate`),
/// common offset-less timestamps (assumed UTC), and bare dates.
#[must_use]
pub fn try_parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    // Offset-less timestamps are assumed UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

/// Soft date parsing: unparsable input degrades to the current time with a
/// warning rather than failing the record.
#[must_use]
pub fn parse_date(value: &str) -> DateTime<Utc> {
    try_parse_date(value).unwrap_or_else(|| {
        tracing::warn!(value, "unparsable publish date — falling back to now");
        Utc::now()
    })
}

/// Derives `(section, subsection)` from a URL path.
///
/// Generic/boilerplate segments, purely numeric segments (dates, article
/// ids), and segments shorter than 3 chars are discarded; the first two
/// survivors become section and subsection, title-cased with hyphens
/// turned into spaces. Defaults to `("general", "")`.
#[must_use]
pub fn extract_section(url: &str) -> (String, String) {
    let Ok(parsed) = url::Url::parse(url) else {
        return ("general".to_string(), String::new());
    };

    let Some(segments) = parsed.path_segments() else {
        return ("general".to_string(), String::new());
    };
    let relevant: Vec<&str> = segments
        .filter(|s| !s.is_empty())
        .filter(|s| !SECTION_STOPLIST.contains(&s.to_lowercase().as_str()))
        .filter(|s| !s.replace('-', "").chars().all(|c| c.is_ascii_digit()))
        .filter(|s| s.chars().count() > 2)
        .collect();

    let section = relevant
        .first()
        .map_or_else(|| "general".to_string(), |s| title_case(s));
    let subsection = relevant.get(1).map(|s| title_case(s)).unwrap_or_default();

    (section, subsection)
}

/// Title-cases a hyphenated path segment, dropping pure-numeric words
/// (article ids): `"articulo-sobre-ia-12345"` → `"Articulo Sobre Ia"`.
fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .filter(|w| !w.is_empty() && !w.chars().all(|c| c.is_ascii_digit()))
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip HTML tags from a string and normalize whitespace. Feed summaries
/// routinely embed markup.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    clean_text(&out)
}

/// Char-boundary-safe prefix truncation for summary/html previews.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

//! CSS-selector heuristics: the last extraction layer before giving up on
//! a field. Pulls headline, body paragraphs, bylines, and images straight
//! from the DOM.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use prensa_core::SiteDescriptor;

use crate::normalize::clean_text;

pub(crate) const MAX_IMAGES: usize = 5;

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static ARTICLE_P: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article p").expect("valid selector"));
static ANY_P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static ARTICLE_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article img[src]").expect("valid selector"));

/// Generic byline selectors, tried after the site-specific list.
const BYLINE_SELECTORS: [&str; 6] = [
    ".author",
    ".byline",
    ".firma",
    ".autor",
    "[itemprop=\"author\"]",
    ".article-author",
];

#[derive(Debug, Default, Clone)]
pub(crate) struct DomFields {
    pub title: Option<String>,
    pub text: String,
    pub bylines: Vec<String>,
    pub images: Vec<String>,
}

pub(crate) fn extract(doc: &Html, site: &SiteDescriptor) -> DomFields {
    DomFields {
        title: headline(doc),
        text: body_text(doc),
        bylines: bylines(doc, site),
        images: images(doc),
    }
}

/// `<h1>` wins over `<title>`; the latter usually carries the site name.
fn headline(doc: &Html) -> Option<String> {
    first_text(doc, &H1).or_else(|| first_text(doc, &TITLE))
}

/// Paragraphs inside `<article>` when the page has one, any paragraph
/// otherwise. Joined with newlines to keep paragraph boundaries.
fn body_text(doc: &Html) -> String {
    let paragraphs = select_texts(doc, &ARTICLE_P);
    let paragraphs = if paragraphs.is_empty() {
        select_texts(doc, &ANY_P)
    } else {
        paragraphs
    };
    paragraphs.join("\n")
}

/// Raw byline candidates: the site's own selectors first, the generic
/// list second. Cleaning happens downstream.
fn bylines(doc: &Html, site: &SiteDescriptor) -> Vec<String> {
    let mut found = Vec::new();
    for raw in site
        .byline_selectors
        .iter()
        .map(String::as_str)
        .chain(BYLINE_SELECTORS)
    {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::debug!(site = %site.name, selector = raw, "skipping unparseable byline selector");
            continue;
        };
        for el in doc.select(&selector) {
            let text = clean_text(&el.text().collect::<String>());
            if !text.is_empty() {
                found.push(text);
            }
        }
        if !found.is_empty() {
            break;
        }
    }
    found
}

fn images(doc: &Html) -> Vec<String> {
    doc.select(&ARTICLE_IMG)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .filter(|src| src.starts_with("http"))
        .map(str::to_owned)
        .take(MAX_IMAGES)
        .collect()
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn select_texts(doc: &Html, selector: &Selector) -> Vec<String> {
    doc.select(selector)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;

//! Meta-tag extraction: the second layer, consulted when JSON-LD is
//! missing or incomplete.

use scraper::{Html, Selector};

/// Author meta tags in priority order. Publishers disagree on where the
/// byline lives; the first list with content wins.
const AUTHOR_TAGS: [&str; 7] = [
    "author",
    "article:author",
    "sailthru.author",
    "dc.creator",
    "dcterms.creator",
    "parsely-author",
    "twitter:creator",
];

const DATE_TAGS: [&str; 4] = [
    "article:published_time",
    "parsely-pub-date",
    "date",
    "og:article:published_time",
];

const DESCRIPTION_TAGS: [&str; 2] = ["og:description", "description"];
const TITLE_TAGS: [&str; 2] = ["og:title", "twitter:title"];
const KEYWORD_TAGS: [&str; 2] = ["news_keywords", "keywords"];
const IMAGE_TAGS: [&str; 2] = ["og:image", "twitter:image"];

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct MetaFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
    pub image: Option<String>,
}

pub(crate) fn extract(doc: &Html) -> MetaFields {
    MetaFields {
        title: first_content(doc, &TITLE_TAGS),
        description: first_content(doc, &DESCRIPTION_TAGS),
        published: first_content(doc, &DATE_TAGS),
        authors: all_contents(doc, &AUTHOR_TAGS),
        keywords: first_content(doc, &KEYWORD_TAGS)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
        image: first_content(doc, &IMAGE_TAGS),
    }
}

/// First non-empty `content` among the given tag names, checking both the
/// `name` and `property` attributes.
fn first_content(doc: &Html, tags: &[&str]) -> Option<String> {
    tags.iter()
        .find_map(|tag| contents(doc, tag).into_iter().next())
}

/// All non-empty `content` values across the given tag names, in priority
/// order. A page may carry several `author` metas for a co-written piece.
fn all_contents(doc: &Html, tags: &[&str]) -> Vec<String> {
    tags.iter().flat_map(|tag| contents(doc, tag)).collect()
}

fn contents(doc: &Html, tag: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(&format!(r#"meta[name="{tag}"], meta[property="{tag}"]"#))
    else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "meta_test.rs"]
mod tests;

//! Structured-data extraction from `application/ld+json` script blocks.
//!
//! The most reliable layer: Spanish publishers ship schema.org
//! `NewsArticle` objects on nearly every article page, sometimes nested
//! inside an `@graph` envelope.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});

/// schema.org types treated as article payloads.
const ARTICLE_TYPES: [&str; 5] = [
    "NewsArticle",
    "Article",
    "ReportageNewsArticle",
    "BlogPosting",
    "LiveBlogPosting",
];

/// Fields pulled from the first article-typed JSON-LD object on the page.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct StructuredArticle {
    pub headline: Option<String>,
    pub date_published: Option<String>,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
    pub images: Vec<String>,
}

/// Scan every ld+json block and return the first article object found.
/// Malformed JSON blocks are skipped, not fatal.
pub(crate) fn extract(doc: &Html) -> Option<StructuredArticle> {
    for script in doc.select(&LD_JSON) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            tracing::debug!("skipping malformed ld+json block");
            continue;
        };
        if let Some(article) = find_article(&value) {
            return Some(article);
        }
    }
    None
}

/// Walk a JSON-LD value: a bare object, a top-level array, or an `@graph`
/// envelope. Returns the first article-typed node.
fn find_article(value: &Value) -> Option<StructuredArticle> {
    match value {
        Value::Array(items) => items.iter().find_map(find_article),
        Value::Object(obj) => {
            if is_article_type(obj.get("@type")) {
                return Some(from_object(obj));
            }
            obj.get("@graph").and_then(find_article)
        }
        _ => None,
    }
}

/// `@type` may be a string or an array of strings.
fn is_article_type(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(s)) => ARTICLE_TYPES.contains(&s.as_str()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| ARTICLE_TYPES.contains(&s)),
        _ => false,
    }
}

fn from_object(obj: &serde_json::Map<String, Value>) -> StructuredArticle {
    StructuredArticle {
        headline: string_field(obj.get("headline")),
        date_published: string_field(obj.get("datePublished")),
        description: string_field(obj.get("description")),
        authors: author_names(obj.get("author")),
        keywords: keyword_list(obj.get("keywords")),
        images: image_urls(obj.get("image")),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `author` appears as a bare string, an object with `name`, or an array
/// mixing both shapes.
fn author_names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Object(obj)) => string_field(obj.get("name")).into_iter().collect(),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| author_names(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// `keywords` appears as a comma-joined string or an array of strings.
fn keyword_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// `image` appears as a URL string, an `ImageObject` with `url`, or an
/// array of either.
fn image_urls(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Object(obj)) => string_field(obj.get("url")).into_iter().collect(),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| image_urls(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "jsonld_test.rs"]
mod tests;

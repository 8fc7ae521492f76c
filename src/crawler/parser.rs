//! HTML parser for extracting the page title and outbound links
//!
//! This module handles parsing HTML content to extract:
//! - The page title, with the site's title suffix removed
//! - Article links that stay inside the crawled site

use crate::url::SiteScope;
use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title; empty when the page has none
    pub title: String,

    /// In-scope links in document order, absolute and normalized
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the title and followable links
///
/// # Link Extraction Rules
///
/// Every `<a href>` is visited in document order. An href is kept only when
/// [`SiteScope::resolve_link`] accepts it: a path-rooted article reference
/// without a namespace colon or a fragment. Duplicates on one page are kept;
/// the frontier's admission check discards them.
///
/// # Example
///
/// ```
/// use lantern_crawl::crawler::parse_html;
/// use lantern_crawl::url::SiteScope;
///
/// let scope = SiteScope::new("https://en.wikipedia.org", "/wiki/").unwrap();
/// let html = r#"<html><head><title>Foo - Wikipedia</title></head>
///               <body><a href="/wiki/Bar">Bar</a></body></html>"#;
/// let parsed = parse_html(html, &scope, " - Wikipedia");
/// assert_eq!(parsed.title, "Foo");
/// assert_eq!(parsed.links, vec!["https://en.wikipedia.org/wiki/Bar".to_string()]);
/// ```
pub fn parse_html(html: &str, scope: &SiteScope, title_suffix: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document, title_suffix),
        links: extract_links(&document, scope),
    }
}

/// Extracts the first `<title>` in document order, trimmed and without the site suffix
fn extract_title(document: &Html, title_suffix: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    let Some(element) = document.select(&selector).next() else {
        return String::new();
    };

    let text = element.text().collect::<String>();
    let trimmed = text.trim();

    match trimmed.strip_suffix(title_suffix) {
        Some(stripped) if !title_suffix.is_empty() => stripped.trim_end().to_string(),
        _ => trimmed.to_string(),
    }
}

/// Extracts all in-scope links from the HTML document
fn extract_links(document: &Html, scope: &SiteScope) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| scope.resolve_link(href))
        .collect()
}

// src/fetch/html.rs
// =============================================================================
// This module extracts outbound links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to:
// - Resolve relative links against the page URL
// - Drop #fragments so "page#a" and "page#b" are the same page
// - Compare hosts when the crawl is restricted to one site
//
// Rust concepts:
// - Option<T>: For links that cannot be resolved
// - HashSet: To drop duplicate links on the same page
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts every crawlable link from an HTML document
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//   host: if set, only links on this host are kept
//
// Returns: absolute http(s) URLs in document order, each at most once
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='/docs#intro'>Intro</a>"
//   page_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, page_url: &Url, host: Option<&str>) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, it always parses
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(page_url, href) else {
            continue;
        };
        if let Some(host) = host {
            if url.host_str() != Some(host) {
                continue;
            }
        }

        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

// Resolves a (possibly relative) href to an absolute http(s) URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    // Skip in-page anchors and special protocols
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/page/").unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_links(html, &base(), None);
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_links() {
        let html = r#"
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
            <a href="child">Child</a>
        "#;
        let links = extract_links(html, &base(), None);
        assert_eq!(
            links,
            vec![
                "https://example.com/docs",
                "https://example.com/about",
                "https://example.com/page/child",
            ]
        );
    }

    #[test]
    fn test_skip_non_http() {
        let html = r##"
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:123">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a href="#top">Top</a>
            <a href="ftp://example.com/file">FTP</a>
        "##;
        assert!(extract_links(html, &base(), None).is_empty());
    }

    #[test]
    fn test_fragments_and_duplicates_collapse() {
        let html = r#"
            <a href="/docs#intro">Intro</a>
            <a href="/docs#usage">Usage</a>
            <a href="/docs">Docs</a>
        "#;
        let links = extract_links(html, &base(), None);
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_same_host_filter() {
        let html = r#"
            <a href="https://other.com/x">Other</a>
            <a href="/local">Local</a>
        "#;
        let links = extract_links(html, &base(), Some("example.com"));
        assert_eq!(links, vec!["https://example.com/local"]);
    }
}

//! HTML helpers for provider responses
//!
//! `scraper::Html` is `!Send`; every function here parses and returns owned
//! data so callers never hold a document across an await.

use hub_core::text::normalize_whitespace;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static RESULT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".result").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").unwrap());
static SNIPPET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__snippet, .result__snippet").unwrap());

/// One organic result from an HTML search page
#[derive(Debug, Clone, PartialEq)]
pub struct SearchLink {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Parse DuckDuckGo's HTML results page
pub fn parse_duckduckgo_results(html: &str, limit: usize) -> Vec<SearchLink> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for result in document.select(&RESULT_SELECTOR) {
        if results.len() >= limit {
            break;
        }

        let Some(link) = result.select(&LINK_SELECTOR).next() else {
            continue;
        };

        let title = normalize_whitespace(&link.text().collect::<String>());
        let url = resolve_redirect(link.value().attr("href").unwrap_or_default());

        // Ads and internal links have no external destination
        if title.is_empty() || !url.starts_with("http") || url.contains("duckduckgo.com/y.js") {
            continue;
        }

        let snippet = result
            .select(&SNIPPET_SELECTOR)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchLink { title, url, snippet });
    }

    results
}

/// Unwrap `//duckduckgo.com/l/?uddg=<encoded>&rut=...` redirect links
pub fn resolve_redirect(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + "uddg=".len();
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            if let Ok(decoded) = urlencoding::decode(encoded) {
                return decoded.into_owned();
            }
        }
    }

    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    href.to_string()
}

/// Text content of an HTML fragment, tags removed and entities decoded
pub fn strip_tags(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    normalize_whitespace(&parsed.root_element().text().collect::<String>())
}

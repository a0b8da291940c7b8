//! Text helpers shared by the classifier, scorer and aggregator

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Words ignored when measuring query/term overlap
pub const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for",
    "from", "how", "in", "into", "is", "it", "its", "latest", "new", "of", "on", "or",
    "the", "their", "this", "to", "vs", "was", "what", "when", "where", "which", "who",
    "why", "with",
];

/// Lower-cased word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Distinct content terms of a query, in first-seen order
pub fn query_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .filter(|t| t.chars().count() > 1 || t.chars().all(|c| c.is_numeric()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Lower-case and collapse whitespace
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deduplication key for a URL.
///
/// Case-folded, fragment dropped, scheme and `www.` removed, trailing slashes
/// trimmed: `HTTPS://www.Example.org/Wiki/X/` → `example.org/wiki/x`.
pub fn normalize_url(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    let without_fragment = lowered.split('#').next().unwrap_or_default();
    let without_scheme = without_fragment
        .strip_prefix("https://")
        .or_else(|| without_fragment.strip_prefix("http://"))
        .unwrap_or(without_fragment);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}

/// Host part of a URL without `www.`
pub fn host_of(url: &str) -> Option<String> {
    let lowered = url.trim().to_lowercase();
    let rest = lowered.split_once("://").map(|(_, r)| r.to_string())?;
    let host = rest
        .split(['/', '?', '#', ':'])
        .next()
        .filter(|h| !h.is_empty())?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Truncate to at most `max_chars` characters, appending "..." when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

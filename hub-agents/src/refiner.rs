//! Query shaping per adapter
//!
//! Providers respond best to different query shapes: web search takes the
//! full text plus a category bias, code search only wants keywords.

use hub_core::{text, AdapterId, Category, ScoringTables};

/// Shape query text for one adapter
pub fn refine_query(
    adapter: AdapterId,
    query: &str,
    category: Category,
    tables: &ScoringTables,
) -> String {
    let base = text::normalize_whitespace(query);

    match adapter {
        AdapterId::Web => match tables.web_bias(category) {
            Some(bias) if !bias.trim().is_empty() => format!("{} {}", base, bias.trim()),
            _ => base,
        },
        AdapterId::Encyclopedia | AdapterId::Community => base,
        AdapterId::Code => keyword_query(query),
    }
}

/// Content terms only, or the trimmed text when every word is a stopword
pub fn keyword_query(query: &str) -> String {
    let terms = text::query_terms(query);
    if terms.is_empty() {
        text::normalize_whitespace(query)
    } else {
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ScoringTables {
        ScoringTables::embedded().unwrap()
    }

    #[test]
    fn test_web_query_gets_category_bias() {
        let t = tables();
        assert_eq!(
            refine_query(AdapterId::Web, "flu  symptoms", Category::Health, &t),
            "flu symptoms medical research"
        );
        assert_eq!(
            refine_query(AdapterId::Web, "pasta", Category::Food, &t),
            "pasta"
        );
    }

    #[test]
    fn test_code_query_keeps_keywords_only() {
        let t = tables();
        assert_eq!(
            refine_query(AdapterId::Code, "What is the best Rust web framework", Category::Technology, &t),
            "best rust web framework"
        );
        // All stopwords: fall back to the text itself
        assert_eq!(refine_query(AdapterId::Code, "what is", Category::General, &t), "what is");
    }

    #[test]
    fn test_encyclopedia_query_unchanged() {
        let t = tables();
        assert_eq!(
            refine_query(AdapterId::Encyclopedia, " Quantum computing ", Category::Technology, &t),
            "Quantum computing"
        );
    }
}

//! External search provider registry
//!
//! Endpoint templates for every provider an adapter can call.
//! Placeholders: `{query}` (URL-encoded by `build_url`), `{limit}`, and
//! provider-specific ones such as `{subreddits}` filled in by the adapter.

use serde::Serialize;

use crate::AdapterId;

/// An external search endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    /// Human-readable name
    pub name: &'static str,
    /// Adapter that calls this provider
    pub adapter: AdapterId,
    /// URL template
    pub url_template: &'static str,
    /// Whether an API key/token is needed to use it at all
    pub requires_key: bool,
}

impl Provider {
    /// Build the request URL for a query and result limit
    pub fn build_url(&self, query: &str, limit: usize) -> String {
        self.url_template
            .replace("{query}", &urlencoding::encode(query))
            .replace("{limit}", &limit.to_string())
    }
}

pub const DUCKDUCKGO: Provider = Provider {
    name: "DuckDuckGo",
    adapter: AdapterId::Web,
    url_template: "https://html.duckduckgo.com/html/?q={query}",
    requires_key: false,
};

pub const BRAVE: Provider = Provider {
    name: "Brave Search",
    adapter: AdapterId::Web,
    url_template: "https://api.search.brave.com/res/v1/web/search?q={query}&count={limit}",
    requires_key: true,
};

pub const WIKIPEDIA: Provider = Provider {
    name: "Wikipedia",
    adapter: AdapterId::Encyclopedia,
    url_template: "https://en.wikipedia.org/w/api.php?action=query&list=search&format=json&srprop=snippet%7Ctimestamp&srsearch={query}&srlimit={limit}",
    requires_key: false,
};

pub const REDDIT: Provider = Provider {
    name: "Reddit",
    adapter: AdapterId::Community,
    url_template: "https://www.reddit.com/search.json?q={query}&sort=relevance&limit={limit}",
    requires_key: false,
};

pub const REDDIT_SUBREDDITS: Provider = Provider {
    name: "Reddit (subreddits)",
    adapter: AdapterId::Community,
    url_template: "https://www.reddit.com/r/{subreddits}/search.json?q={query}&restrict_sr=1&sort=relevance&limit={limit}",
    requires_key: false,
};

pub const GITHUB: Provider = Provider {
    name: "GitHub",
    adapter: AdapterId::Code,
    url_template: "https://api.github.com/search/repositories?q={query}&sort=stars&order=desc&per_page={limit}",
    requires_key: false,
};

/// Every known provider
pub static PROVIDERS: &[Provider] = &[DUCKDUCKGO, BRAVE, WIKIPEDIA, REDDIT, REDDIT_SUBREDDITS, GITHUB];

/// Providers behind one adapter
pub fn providers_for(adapter: AdapterId) -> impl Iterator<Item = &'static Provider> {
    PROVIDERS.iter().filter(move |p| p.adapter == adapter)
}

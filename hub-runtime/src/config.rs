//! Hub configuration
//!
//! Every section has defaults, so an empty (or absent) TOML file is valid.
//! Secrets are never read from the file by the CLI: they come from flags or
//! their environment variables and are merged in with [`HubConfig::with_keys`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use hub_agents::{
    create_backend, AdapterRegistry, AdapterSettings, FallbackSummarizer, LlmProvider,
    LlmSettings, ModelSummarizer, Summarizer, TemplateSummarizer,
};
use hub_core::{
    FileCache, MemoryCache, ScoringTables, SharedCache, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_SOURCES,
    MAX_SOURCES_CAP,
};

use crate::{OrchestratorSettings, ResearchAgent};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    pub default_max_sources: usize,
    pub max_sources_cap: usize,
    pub adapter_timeout_secs: u64,
    pub query_timeout_secs: u64,
    /// Zero keeps cached results forever
    pub cache_ttl_secs: u64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            default_max_sources: DEFAULT_MAX_SOURCES,
            max_sources_cap: MAX_SOURCES_CAP,
            adapter_timeout_secs: 8,
            query_timeout_secs: 20,
            cache_ttl_secs: 3600,
        }
    }
}

impl ResearchSettings {
    pub fn orchestrator(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            adapter_timeout: Duration::from_secs(self.adapter_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            max_sources_cap: self.max_sources_cap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    None,
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Directory for the file backend
    pub dir: PathBuf,
    /// Entry cap for the memory backend
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            dir: PathBuf::from(".research-cache"),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Secrets supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub brave: Option<String>,
    pub github: Option<String>,
    pub anthropic: Option<String>,
    pub openai: Option<String>,
    pub openrouter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub server: ServerSettings,
    pub research: ResearchSettings,
    pub cache: CacheSettings,
    pub adapters: AdapterSettings,
    pub llm: LlmSettings,
    /// Scoring tables override; the embedded tables are used when unset
    pub tables: Option<PathBuf>,
}

impl HubConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from a file when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Merge secrets. With no provider configured, the first available key
    /// selects one: Anthropic, then OpenAI, then OpenRouter.
    pub fn with_keys(mut self, keys: ApiKeys) -> Self {
        if keys.brave.is_some() {
            self.adapters.brave_api_key = keys.brave;
        }
        if keys.github.is_some() {
            self.adapters.github_token = keys.github;
        }

        let key_for = |provider: LlmProvider| match provider {
            LlmProvider::Anthropic => keys.anthropic.clone(),
            LlmProvider::OpenAi => keys.openai.clone(),
            LlmProvider::OpenRouter => keys.openrouter.clone(),
            LlmProvider::Local | LlmProvider::None => None,
        };

        if self.llm.provider == LlmProvider::None {
            let detected = [LlmProvider::Anthropic, LlmProvider::OpenAi, LlmProvider::OpenRouter]
                .into_iter()
                .find(|p| key_for(*p).is_some());
            if let Some(provider) = detected {
                self.llm.provider = provider;
            }
        }

        if self.llm.api_key.is_none() {
            self.llm.api_key = key_for(self.llm.provider);
        }
        self
    }

    pub fn load_tables(&self) -> Result<ScoringTables> {
        match &self.tables {
            Some(path) => ScoringTables::load(path)
                .with_context(|| format!("Failed to load scoring tables {}", path.display())),
            None => ScoringTables::embedded().context("Embedded scoring tables are invalid"),
        }
    }

    pub fn build_cache(&self) -> Option<SharedCache> {
        match self.cache.backend {
            CacheBackend::None => None,
            CacheBackend::Memory => Some(Arc::new(MemoryCache::with_max_entries(self.cache.max_entries))),
            CacheBackend::File => Some(Arc::new(FileCache::new(self.cache.dir.clone()))),
        }
    }
}

/// Wire the configured agent: tables, network adapters, summarizer, cache
pub fn build_agent(config: &HubConfig) -> Result<ResearchAgent> {
    let tables = Arc::new(config.load_tables()?);

    let registry = AdapterRegistry::from_settings(&config.adapters, tables.clone())
        .context("Failed to create HTTP client")?;

    let model = create_backend(&config.llm)
        .context("Failed to configure summarizer backend")?
        .map(|backend| ModelSummarizer::new(backend, config.llm.timeout()));
    let summarizer = FallbackSummarizer::new(model, TemplateSummarizer::default());

    info!(
        "Research agent ready: {} adapters, summarizer {}",
        registry.len(),
        summarizer.name()
    );

    let mut agent = ResearchAgent::new(tables, registry, Arc::new(summarizer))
        .with_settings(config.research.orchestrator());
    if let Some(cache) = config.build_cache() {
        agent = agent.with_cache(cache);
    }
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.research.default_max_sources, 10);
        assert_eq!(config.research.max_sources_cap, 50);
        assert_eq!(config.research.adapter_timeout_secs, 8);
        assert_eq!(config.research.query_timeout_secs, 20);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.max_entries, DEFAULT_MAX_ENTRIES);
        assert_eq!(config.llm.provider, LlmProvider::None);
        assert!(config.tables.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = HubConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.research.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_toml_overrides() {
        let config = HubConfig::from_toml_str(
            r#"
            [server]
            port = 9000

            [research]
            adapter_timeout_secs = 3
            max_sources_cap = 20

            [cache]
            backend = "file"
            dir = "/tmp/hub"

            [adapters]
            disabled = ["code"]

            [adapters.http]
            max_retries = 0

            [llm]
            provider = "local"
            model = "qwen2.5"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.research.adapter_timeout_secs, 3);
        assert_eq!(config.research.query_timeout_secs, 20);
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config.adapters.disabled, vec![hub_core::AdapterId::Code]);
        assert_eq!(config.adapters.http.max_retries, 0);
        assert_eq!(config.llm.provider, LlmProvider::Local);

        let settings = config.research.orchestrator();
        assert_eq!(settings.adapter_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_sources_cap, 20);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(HubConfig::from_toml_str("[cache]\nbackend = \"redis\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"0.0.0.0\"").unwrap();
        let config = HubConfig::load(file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");

        assert!(HubConfig::load("/nonexistent/hub.toml").is_err());
    }

    #[test]
    fn test_keys_select_provider() {
        let config = HubConfig::default().with_keys(ApiKeys {
            brave: Some("brave".to_string()),
            openai: Some("sk-openai".to_string()),
            openrouter: Some("sk-or".to_string()),
            ..ApiKeys::default()
        });
        assert_eq!(config.adapters.brave_api_key.as_deref(), Some("brave"));
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-openai"));

        let pinned = HubConfig::from_toml_str("[llm]\nprovider = \"openrouter\"")
            .unwrap()
            .with_keys(ApiKeys {
                anthropic: Some("sk-ant".to_string()),
                openrouter: Some("sk-or".to_string()),
                ..ApiKeys::default()
            });
        assert_eq!(pinned.llm.provider, LlmProvider::OpenRouter);
        assert_eq!(pinned.llm.api_key.as_deref(), Some("sk-or"));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = HubConfig::default().with_keys(ApiKeys {
            github: Some("ghp_secret".to_string()),
            anthropic: Some("sk-ant-secret".to_string()),
            ..ApiKeys::default()
        });
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn test_build_agent_from_defaults() {
        let config = HubConfig::from_toml_str("[cache]\nbackend = \"none\"").unwrap();
        let agent = build_agent(&config).unwrap();
        assert_eq!(agent.registry().len(), 4);

        let status = agent.describe(Duration::ZERO);
        assert_eq!(status.summarizer, "template");
        assert!(status.cache.is_none());
        assert_eq!(status.defaults.adapter_timeout_secs, 8.0);
    }

    #[test]
    fn test_bad_tables_path_fails() {
        let config = HubConfig {
            tables: Some(PathBuf::from("/nonexistent/tables.toml")),
            ..HubConfig::default()
        };
        assert!(build_agent(&config).is_err());
    }
}

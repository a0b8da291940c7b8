//! Research Hub CLI
//!
//! Multi-source research aggregation with topic classification and quality
//! scoring, as a one-shot command or an HTTP service.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hub_core::{
    text, AdapterId, AdapterStatus, Query, ResearchResult, ResearchState, TopicClassifier,
    PROVIDERS,
};
use hub_net::HttpClient;
use hub_runtime::{build_agent, ApiKeys, AppState, HubConfig};

#[derive(Parser)]
#[command(name = "research-hub")]
#[command(author, version, about = "Research Hub: multi-source research aggregation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scoring tables override (TOML)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    #[command(flatten)]
    keys: KeyArgs,
}

#[derive(Args)]
struct KeyArgs {
    /// Brave Search API key (or set BRAVE_API_KEY env var)
    #[arg(long, env = "BRAVE_API_KEY", global = true, hide_env_values = true)]
    brave_key: Option<String>,

    /// GitHub token (or set GITHUB_TOKEN env var)
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    github_token: Option<String>,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long, env = "ANTHROPIC_API_KEY", global = true, hide_env_values = true)]
    anthropic_key: Option<String>,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    openai_key: Option<String>,

    /// OpenRouter API key (or set OPENROUTER_API_KEY env var)
    #[arg(long, env = "OPENROUTER_API_KEY", global = true, hide_env_values = true)]
    openrouter_key: Option<String>,
}

impl From<KeyArgs> for ApiKeys {
    fn from(keys: KeyArgs) -> Self {
        ApiKeys {
            brave: keys.brave_key,
            github: keys.github_token,
            anthropic: keys.anthropic_key,
            openai: keys.openai_key,
            openrouter: keys.openrouter_key,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one research request
    Query {
        /// The research query
        #[arg(short, long)]
        query: String,

        /// Maximum number of sources (1-50)
        #[arg(long)]
        max_sources: Option<usize>,

        /// Research type: quick, academic, technical or comprehensive
        #[arg(long)]
        research_type: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the HTTP service
    Serve {
        /// Bind address
        #[arg(long, env = "HUB_HOST")]
        host: Option<String>,

        /// Bind port
        #[arg(long, env = "HUB_PORT")]
        port: Option<u16>,
    },

    /// Show capabilities and probe every search provider
    Status,

    /// Classify a query without searching
    Classify {
        /// The query to classify
        #[arg(short, long)]
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let mut config = HubConfig::load_or_default(cli.config.as_deref())?.with_keys(cli.keys.into());
    if cli.tables.is_some() {
        config.tables = cli.tables;
    }

    match cli.command {
        Commands::Query {
            query,
            max_sources,
            research_type,
            format,
            output,
        } => {
            run_query(&config, &query, max_sources, research_type, format, output).await?;
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Commands::Status => {
            check_status(&config).await?;
        }
        Commands::Classify { query } => {
            classify(&config, &query)?;
        }
    }

    Ok(())
}

async fn run_query(
    config: &HubConfig,
    text: &str,
    max_sources: Option<usize>,
    research_type: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let agent = build_agent(config)?;

    let mut query = Query::new(text)
        .with_max_sources(max_sources.unwrap_or(config.research.default_max_sources));
    if let Some(research_type) = research_type {
        query = query.with_research_type(research_type);
    }

    let result = agent.research(query).await?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Markdown => render_markdown(&result),
    };

    match output {
        Some(path) => {
            fs::write(&path, &rendered)?;
            println!(
                "✅ {} sources (quality {:.3}) in {:.2}s",
                result.sources_found, result.quality_score, result.execution_time
            );
            println!("📄 Result saved to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if result.state == ResearchState::Failed {
        anyhow::bail!("research failed: {}", result.summary);
    }
    Ok(())
}

async fn serve(config: HubConfig) -> Result<()> {
    let agent = build_agent(&config)?;
    let state = AppState::new(agent).with_default_max_sources(config.research.default_max_sources);

    println!("🚀 Research Hub on http://{}:{}", config.server.host, config.server.port);
    hub_runtime::run(Arc::new(state), &config.server.host, config.server.port).await
}

async fn check_status(config: &HubConfig) -> Result<()> {
    let agent = build_agent(config)?;
    let descriptor = agent.describe(Duration::ZERO);

    println!("📡 {} v{}\n", descriptor.name, descriptor.version);
    for adapter in &descriptor.adapters {
        println!("   {:<13} {}", adapter.id.as_str(), adapter.provider);
    }
    println!("\n   Summarizer: {}", descriptor.summarizer);
    println!("   Cache: {}", descriptor.cache.as_deref().unwrap_or("disabled"));
    println!(
        "   Timeouts: {}s per adapter, {}s per query\n",
        descriptor.defaults.adapter_timeout_secs, descriptor.defaults.query_timeout_secs
    );

    println!("🔌 Probing providers...\n");
    let client = HttpClient::new(config.adapters.http.clone())?;
    let probes = PROVIDERS
        .iter()
        .filter(|p| !p.url_template.contains("{subreddits}"))
        .map(|provider| {
            let client = &client;
            async move {
                let keyed = match provider.adapter {
                    AdapterId::Web => config.adapters.brave_api_key.is_some(),
                    _ => true,
                };
                if provider.requires_key && !keyed {
                    return (provider, None);
                }
                (provider, Some(client.probe(&provider.build_url("test", 1)).await))
            }
        });

    for (provider, reachable) in futures::future::join_all(probes).await {
        match reachable {
            Some(true) => println!("✅ {} reachable", provider.name),
            Some(false) => println!("❌ {} unreachable", provider.name),
            None => println!("⏭️  {} skipped (no API key)", provider.name),
        }
    }

    Ok(())
}

fn classify(config: &HubConfig, text: &str) -> Result<()> {
    let tables = Arc::new(config.load_tables()?);
    let classification = TopicClassifier::new(tables).classify_detailed(text)?;
    let adapters = classification
        .category
        .adapters(Query::new(text).mode())
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!("🏷️  Category: {}", classification.category);
    if classification.matched_keywords.is_empty() {
        println!("   Keywords: (none, fallback)");
    } else {
        println!("   Keywords: {}", classification.matched_keywords.join(", "));
    }
    println!("   Terms: {}", classification.terms.join(", "));
    println!("   Adapters: {}", adapters);
    Ok(())
}

fn status_label(status: AdapterStatus) -> &'static str {
    match status {
        AdapterStatus::Ok => "ok",
        AdapterStatus::Empty => "empty",
        AdapterStatus::Failed => "failed",
        AdapterStatus::TimedOut => "timed out",
        AdapterStatus::Skipped => "skipped",
    }
}

/// Render a result as a Markdown report
fn render_markdown(result: &ResearchResult) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Research: {}\n\n", result.query.trim()));
    md.push_str(&format!("- **Category:** {}\n", result.category));
    if let Some(research_type) = &result.research_type {
        md.push_str(&format!("- **Research type:** {}\n", research_type));
    }
    md.push_str(&format!(
        "- **Sources:** {} (quality {:.3})\n",
        result.sources_found, result.quality_score
    ));
    let contributing = result.contributing_adapters();
    if !contributing.is_empty() {
        let names: Vec<&str> = contributing.iter().map(|a| a.as_str()).collect();
        md.push_str(&format!("- **Found by:** {}\n", names.join(", ")));
    }
    md.push_str(&format!("- **Time:** {:.2}s\n\n", result.execution_time));

    md.push_str("## Summary\n\n");
    md.push_str(result.summary.trim());
    md.push_str("\n\n");

    if !result.sources.is_empty() {
        md.push_str("## Sources\n\n");
        for (i, source) in result.sources.iter().enumerate() {
            md.push_str(&format!(
                "{}. [{}]({}) ({}, {}, relevance {:.2}, credibility {:.2})\n",
                i + 1,
                source.hit.title,
                source.hit.url,
                text::host_of(&source.hit.url).unwrap_or_default(),
                source.hit.source_type,
                source.relevance_score,
                source.credibility_score
            ));
            if !source.hit.snippet.is_empty() {
                md.push_str(&format!("   {}\n", source.hit.snippet));
            }
        }
        md.push('\n');
    }

    if !result.adapters.is_empty() {
        md.push_str("## Adapters\n\n| Adapter | Status | Hits | Time (ms) |\n|---|---|---|---|\n");
        for report in &result.adapters {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                report.adapter,
                status_label(report.status),
                report.hits,
                report.elapsed_ms
            ));
        }
    }

    md
}

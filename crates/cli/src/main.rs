//! ringsnap command-line entry point.
//!
//! Resolves input text into candidate destination actions and prints them as
//! JSON lines. Icon resolution is best-effort and never blocks a result from
//! being produced. Logging goes to stderr so stdout stays machine-readable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ringsnap_client::fetch::{FaviconFetcher, FetchConfig, encode};
use ringsnap_client::icon::{IconResolver, IconStates, SOURCE_COUNT};
use ringsnap_core::cache::{CacheDb, IconCache};
use ringsnap_core::config::AppConfig;
use ringsnap_core::matcher::{self, normalize};
use ringsnap_core::rules::RuleStore;

#[derive(Parser)]
#[command(name = "ringsnap")]
#[command(about = "Resolve text into destination actions with cached icons", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match text against the configured rules
    Match {
        /// Input text; reads stdin when omitted
        text: Option<String>,

        /// Append the search-engine fallback when nothing matches
        #[arg(long)]
        fallback: bool,

        /// Resolve an icon for each result's domain
        #[arg(long)]
        icons: bool,
    },

    /// Icon cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete expired icon entries
    Purge,

    /// Delete every cached icon for a domain
    Clear {
        /// Domain whose entries to remove
        domain: String,
    },
}

/// One candidate action on stdout.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionOutput<'a> {
    name: &'a str,
    target_url: &'a str,
    matched_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Match { text, fallback, icons } => cmd_match(&config, text, fallback, icons).await,
        Commands::Cache { action } => cmd_cache(&config, action).await,
    }
}

async fn cmd_match(config: &AppConfig, text: Option<String>, fallback: bool, icons: bool) -> Result<()> {
    let raw = match text {
        Some(text) => text,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let text = normalize(&raw);

    let rules = RuleStore::new(&config.rules_path).load()?;
    let matched = matcher::match_all(&text, &rules);
    tracing::debug!(rules = rules.len(), matched = matched.len(), "evaluated rule set");
    let results = if matched.is_empty() && fallback {
        matcher::default_search_results(&text)
    } else {
        matched
    };

    let mut resolver = if icons { Some(build_resolver(config).await?) } else { None };
    let mut states = IconStates::new();

    let stdout = std::io::stdout();
    for result in &results {
        let icon = match &mut resolver {
            Some(resolver) => {
                resolve_icon(resolver, &mut states, &result.rule.icon, result.rule.icon_source_index).await
            }
            None => None,
        };

        let output = ActionOutput {
            name: &result.rule.name,
            target_url: &result.target_url,
            matched_text: &result.matched_text,
            icon,
        };
        serde_json::to_writer(&stdout, &output)?;
        println!();
    }

    Ok(())
}

async fn cmd_cache(config: &AppConfig, action: CacheAction) -> Result<()> {
    let db = CacheDb::open(&config.db_path).await?;
    let mut cache = IconCache::new(db).await;

    match action {
        CacheAction::Purge => {
            let purged = cache.evict_expired().await;
            println!("purged {purged} expired entries");
        }
        CacheAction::Clear { domain } => {
            cache.clear_domain(&domain).await;
            println!("cleared icons for {domain}");
        }
    }

    Ok(())
}

/// Resolve an icon for a domain, walking the favicon sources from the rule's
/// preferred index. A source that degrades to a raw URL is kept as a last
/// resort while the next source is tried.
async fn resolve_icon(
    resolver: &mut IconResolver<FaviconFetcher>, states: &mut IconStates, domain: &str, start_index: u32,
) -> Option<String> {
    states.set_loading(domain);

    let mut last_resort = None;
    for index in start_index..SOURCE_COUNT {
        match resolver.resolve(domain, index).await {
            Some(payload) if encode::is_data_uri(&payload) => {
                states.set_cached(domain);
                return Some(payload);
            }
            Some(raw_url) => last_resort = Some(raw_url),
            None => break,
        }
    }

    states.set_failed(domain);
    last_resort
}

async fn build_resolver(config: &AppConfig) -> Result<IconResolver<FaviconFetcher>> {
    let db = CacheDb::open(&config.db_path).await?;
    let cache = IconCache::new(db).await;
    let fetcher = FaviconFetcher::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        ..Default::default()
    })?;

    Ok(IconResolver::new(cache, fetcher, config.icon_size))
}

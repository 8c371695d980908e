use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nd_agents::AgentWorkflow;
use nd_core::{BusinessField, SearchProvider, SemanticIndex};
use nd_providers::{FixtureSearchProvider, StaticSemanticIndex};

mod render;
mod settings_loader;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Most verbose: all tracing output
    Trace,
    /// Verbose: provider calls, retries, batch dispatch
    Debug,
    /// Standard: stage progress
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(author, version, about = "Newsdesk: a news-curation pipeline", long_about = None)]
struct Cli {
    /// Path to the settings TOML file (default: <config dir>/newsdesk/settings.toml)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Write the rendered report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Simulate an unavailable source for one business field
    /// (hpc, bitcoin or energy-storage); exercises retry and
    /// partial-failure handling
    #[arg(long, value_name = "FIELD")]
    simulate_outage: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn parse_field(value: &str) -> Result<BusinessField> {
    match value.to_lowercase().as_str() {
        "hpc" => Ok(BusinessField::Hpc),
        "bitcoin" => Ok(BusinessField::Bitcoin),
        "energy-storage" | "energy_storage" => Ok(BusinessField::EnergyStorage),
        other => anyhow::bail!(
            "unknown business field '{other}' (expected hpc, bitcoin or energy-storage)"
        ),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = settings_loader::load(cli.settings.as_ref())?;
    info!(
        branches = settings.branches.len(),
        keywords = settings.keywords.len(),
        "settings loaded"
    );

    let now = Utc::now();
    let mut provider = FixtureSearchProvider::new(now, settings.timeframe_days);
    if let Some(field) = &cli.simulate_outage {
        provider = provider.with_unavailable_field(parse_field(field)?);
    }

    let vector_enabled = settings.vector_database.enabled;
    let mut workflow =
        AgentWorkflow::new(settings, Arc::new(provider) as Arc<dyn SearchProvider>)
            .with_reference_time(now);
    if vector_enabled {
        workflow = workflow
            .with_semantic_index(Arc::new(StaticSemanticIndex::new()) as Arc<dyn SemanticIndex>);
    }

    let result = workflow.execute().await.context("curation workflow failed")?;

    let rendered = match cli.format {
        OutputFormat::Markdown => render::to_markdown(&result),
        OutputFormat::Json => render::to_json(&result)?,
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level.as_filter()))
        .init();

    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_accepts_known_slugs() {
        assert_eq!(parse_field("hpc").unwrap(), BusinessField::Hpc);
        assert_eq!(parse_field("Bitcoin").unwrap(), BusinessField::Bitcoin);
        assert_eq!(
            parse_field("energy-storage").unwrap(),
            BusinessField::EnergyStorage
        );
        assert!(parse_field("retail").is_err());
    }
}

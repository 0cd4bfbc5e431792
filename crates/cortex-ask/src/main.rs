//! # cortex-ask
//!
//! Asks the Cortex agent one question and prints the complete answer,
//! following tool continuations and appending deferred tables.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cortex_agent::CortexAgentClient;
use cortex_auth::{CredentialProvider, KeyPairJwtProvider};
use cortex_core::CombinedResponse;
use cortex_runtime::CortexAnalyst;
use cortex_settings::CortexSettings;
use cortex_sql::SnowflakeSqlApi;
use tracing::{debug, info, warn};

/// Ask the Cortex agent a question.
#[derive(Parser, Debug)]
#[command(name = "cortex-ask", about = "Ask the Cortex agent a question")]
struct Cli {
    /// Settings file (defaults to `~/.cortex/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Maximum agent round trips (overrides settings).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    max_iterations: Option<u32>,

    /// Print the combined response as JSON instead of the answer text.
    #[arg(long)]
    json: bool,

    /// Ask the agent to execute this SQL instead of answering a question.
    #[arg(long, conflicts_with = "question")]
    sql: Option<String>,

    /// Natural-language question.
    #[arg(required_unless_present = "sql")]
    question: Option<String>,
}

fn load_settings(path: Option<&Path>, max_iterations: Option<u32>) -> Result<CortexSettings> {
    let path = path.map_or_else(cortex_settings::settings_path, Path::to_path_buf);
    let mut settings = cortex_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    if let Some(max) = max_iterations {
        settings.agent.max_iterations = max;
    }
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

fn init_logging(settings: &CortexSettings) {
    if settings.logging.json {
        cortex_core::logging::init_json_subscriber(&settings.logging.level);
    } else {
        cortex_core::logging::init_subscriber(&settings.logging.level);
    }
}

fn build_analyst(settings: &CortexSettings) -> Result<CortexAnalyst> {
    let credentials: Arc<dyn CredentialProvider> = Arc::new(
        KeyPairJwtProvider::from_settings(&settings.snowflake)
            .context("Failed to load key-pair credentials")?,
    );
    let agent = CortexAgentClient::new(&settings.agent.endpoint, credentials.clone())
        .context("Failed to build agent client")?;
    let warehouse = SnowflakeSqlApi::from_settings(&settings.snowflake, credentials)
        .context("Failed to build SQL API client")?;
    Ok(CortexAnalyst::new(
        Arc::new(agent),
        Arc::new(warehouse),
        settings,
    ))
}

fn render_output(response: &CombinedResponse, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(response).context("Failed to serialize response");
    }
    Ok(response.text.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings = load_settings(args.settings.as_deref(), args.max_iterations)?;
    init_logging(&settings);
    debug!(connection = %settings.connection_info(), "settings loaded");

    let analyst = build_analyst(&settings)?;
    let response = match (&args.sql, &args.question) {
        (Some(sql), _) => analyst.execute_sql(sql).await,
        (None, Some(question)) => analyst.analyze(question).await,
        (None, None) => anyhow::bail!("a question or --sql is required"),
    }
    .context("Agent request failed")?;

    if response.termination.is_complete() {
        info!(iterations = response.iterations_performed, "answer complete");
    } else {
        warn!(
            iterations = response.iterations_performed,
            termination = ?response.termination,
            "answer may be incomplete"
        );
    }

    println!("{}", render_output(&response, args.json)?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;
use crate::infra::llm::GeminiClient;

#[derive(Parser)]
#[command(name = "soporte", author, version, about = "Support-intake chatbot with Jira escalation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive support conversation.
    Chat,
    /// List the ticket categories and their issue types.
    Categories,
    /// Manage chatbot configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the chat transcript.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Categories => cmd::categories::run(),
        Commands::Chat => run_chat().await,
    }
}

async fn run_chat() -> AppResult<()> {
    // Credentials are validated here, before the session starts; a missing
    // secret never surfaces mid-conversation.
    let config = AppConfig::load()?;

    let language_model = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
        config.jira_project_key.clone(),
    ));

    let context = AppContext::new(config, issue_tracker, language_model);
    cmd::chat::run(context).await
}

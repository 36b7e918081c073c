use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use task_planner::config::ServerConfig;
use task_planner::llm::{LlmConfig, create_provider};
use task_planner::plans::PlanService;
use task_planner::routes::{plan_routes, serve};
use task_planner::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "task-planner", version, about = "Break goals into tracked task plans")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on (overrides PLANNER_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Plan file path (overrides PLANNER_PLANS_FILE)
        #[arg(long)]
        plans_file: Option<PathBuf>,
    },
    /// List the models available to the configured API key
    ListModels,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let llm_config = LlmConfig::from_env().context("GEMINI_API_KEY must be set")?;
    let llm = create_provider(&llm_config)?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        plans_file: None,
    }) {
        Command::ListModels => {
            let models = llm.list_models().await.context("Failed to list models")?;
            println!("=== AVAILABLE MODELS ===");
            for model in models {
                println!("Model Name: {}", model.name);
                println!("Display Name: {}", model.display_name);
                println!("Description: {}", model.description);
                println!("Supported Methods: {}", model.supported_methods.join(", "));
                println!("---");
            }
        }
        Command::Serve { port, plans_file } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(plans_file) = plans_file {
                config.plans_file = plans_file;
            }

            let store = JsonFileStore::open(&config.plans_file)
                .await
                .with_context(|| format!("Failed to open {}", config.plans_file.display()))?;

            eprintln!("📋 Task Planner v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("   Model: {}", llm.model_name());
            eprintln!("   Plans: {}", config.plans_file.display());
            eprintln!("   API: http://{}:{}\n", config.host, config.port);

            let service = Arc::new(PlanService::new(llm, Arc::new(store)));
            serve(&config, plan_routes(service)).await?;
        }
    }

    Ok(())
}

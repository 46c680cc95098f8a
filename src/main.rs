//! Wanderlust - agentic AI trip planner CLI
//!
//! Main entry point for the Wanderlust application.

use anyhow::Result;

use wanderlust::assist::Assistant;
use wanderlust::cli::{Cli, Commands};
use wanderlust::commands;
use wanderlust::config::Config;
use wanderlust::logging::init_logging;
use wanderlust::planner::TripPlanner;
use wanderlust::storage::{open_store, TripStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.json_logs)?;

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Plan(args) => {
            tracing::info!("Starting planning session");
            let planner = TripPlanner::from_config(&config)?;
            let store = if args.save {
                Some(open_store(&config.storage)?)
            } else {
                None
            };
            commands::plan::run_plan(
                &planner,
                store.as_ref().map(|s| s as &dyn TripStore),
                args,
            )
            .await?;
            Ok(())
        }
        Commands::Trips { command } => {
            let store = open_store(&config.storage)?;
            tracing::debug!("Using trips database {}", store.db_path().display());
            commands::trips::handle_trips(&store, command).await?;
            Ok(())
        }
        Commands::Analyze { file, prompt } => {
            let assistant = Assistant::from_config(&config)?;
            commands::assist::run_analyze(&assistant, &file, &prompt).await?;
            Ok(())
        }
        Commands::Think { query } => {
            let assistant = Assistant::from_config(&config)?;
            commands::assist::run_think(&assistant, &query).await?;
            Ok(())
        }
        Commands::Maps { query, lat, lng } => {
            let assistant = Assistant::from_config(&config)?;
            commands::assist::run_maps(&assistant, &query, lat, lng).await?;
            Ok(())
        }
    }
}

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, PopularCommands, SavedCommands};
pub use config::Config;
pub use state::SharedState;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);
    init_metrics(&config)?;

    if matches!(cli.command, Commands::Init) {
        if Config::create_default_if_missing()? {
            println!("Created config.toml with default settings");
        } else {
            println!("config.toml already exists");
        }
        return Ok(());
    }

    let state = SharedState::from_config(config).await?;
    dispatch(&state, cli.command).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // stdout carries command output
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.general.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn init_metrics(config: &Config) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    if !config.observability.metrics_enabled {
        return Ok(());
    }

    let builder = PrometheusBuilder::new();
    match config.observability.metrics_port {
        Some(port) => {
            builder
                .with_http_listener(([0, 0, 0, 0], port))
                .install()
                .context("Failed to start Prometheus exporter")?;
            info!(port, "Prometheus exporter listening");
        }
        None => {
            builder
                .install_recorder()
                .context("Failed to install Prometheus recorder")?;
            info!("Prometheus metrics recorder initialized");
        }
    }
    Ok(())
}

async fn dispatch(state: &SharedState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Recipes(args) => cli::cmd_list_recipes(state, args).await,
        Commands::Recipe { id, ingredients } => cli::cmd_recipe(state, id, &ingredients).await,
        Commands::Tags => cli::cmd_tags(state).await,
        Commands::Categories { lang } => cli::cmd_categories(state, &lang).await,
        Commands::Ingredients { search, lang } => {
            cli::cmd_ingredients(state, search.as_deref(), &lang).await
        }
        Commands::Popular { kind } => match kind {
            PopularCommands::Recipes { lang, limit } => {
                cli::cmd_popular_recipes(state, &lang, limit).await
            }
            PopularCommands::Ingredients { lang, limit } => {
                cli::cmd_popular_ingredients(state, &lang, limit).await
            }
        },
        Commands::Saved { command } => match command {
            SavedCommands::List { user, full } => cli::cmd_saved_list(state, user, full).await,
            SavedCommands::Add { user, recipe } => cli::cmd_saved_add(state, user, recipe).await,
            SavedCommands::Remove { user, recipe } => {
                cli::cmd_saved_remove(state, user, recipe).await
            }
        },
        Commands::Cache { action } => cli::cmd_cache(state, &action).await,
        Commands::Init => Ok(()),
    }
}

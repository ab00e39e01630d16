use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use guild_bot::application::errors::{BotError, ConfigError};
use guild_bot::application::messaging::{spawn_event, wait_for_event, Dispatcher};
use guild_bot::domain::traits::{Gateway, GuildStore};
use guild_bot::infrastructure::adapters::{ConsoleAdapter, DiscordAdapter};
use guild_bot::infrastructure::config::{Config, StorageBackend};
use guild_bot::infrastructure::database::Database;
use guild_bot::infrastructure::storage::MemoryGuildStore;

#[derive(Parser)]
#[command(name = "guild-bot")]
#[command(about = "Prefix command bot with per-guild configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.token) {
                tracing::error!("Couldn't start bot: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("guild-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                eprintln!("Failed to render config: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(token) = token_override {
        config.set_token(token);
    }
    Ok(config)
}

fn open_store(config: &Config) -> Result<Arc<dyn GuildStore>, BotError> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db = Database::new(&config.storage.path)?;
            tracing::info!("Database initialized at {}", config.storage.path.display());
            Ok(Arc::new(db))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, guild settings are lost on exit");
            Ok(Arc::new(MemoryGuildStore::new()))
        }
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, token_override)?;
    config.validate()?;

    tracing::info!("Starting {}", config.bot.name);
    let store = open_store(&config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(serve(config, store))
}

async fn serve(config: Config, store: Arc<dyn GuildStore>) -> Result<(), BotError> {
    if let Some(token) = config.discord_token() {
        let api_base = config.adapters.discord.as_ref().and_then(|d| d.api_base.clone());
        let mut adapter = DiscordAdapter::new(token, api_base);
        adapter.fetch_bot_info().await?;

        let adapter = Arc::new(adapter);
        let dispatcher = Dispatcher::with_defaults(
            store,
            adapter.clone(),
            adapter.clone(),
            config.mutation_policy(),
            config.bot.prefix.clone(),
        );
        tracing::info!("Bot is running as {}", adapter.bot_info().name);
        run_discord(Arc::new(dispatcher)).await
    } else {
        let admin = config.adapters.console.as_ref().map(|c| c.admin).unwrap_or(false);
        let adapter = Arc::new(ConsoleAdapter::new(admin));
        let dispatcher = Dispatcher::with_defaults(
            store,
            adapter.clone(),
            adapter.clone(),
            config.mutation_policy(),
            config.bot.prefix.clone(),
        );
        tracing::info!("No token configured, running console bot (dev mode)");
        run_console(Arc::new(dispatcher), adapter).await
    }
}

/// Consume gateway dispatch payloads, one JSON document per line on stdin
async fn run_discord(dispatcher: Arc<Dispatcher>) -> Result<(), BotError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| BotError::Network(e.to_string()))? else {
                    tracing::info!("Gateway stream closed");
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match DiscordAdapter::parse_dispatch(&line) {
                    Ok(Some(event)) => {
                        spawn_event(dispatcher.clone(), event);
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Skipping dispatch: {}", e),
                }
            }
        }
    }
}

async fn run_console(dispatcher: Arc<Dispatcher>, adapter: Arc<ConsoleAdapter>) -> Result<(), BotError> {
    // Join first so the console guild has a configuration
    wait_for_event(spawn_event(dispatcher.clone(), adapter.join_event())).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(e.to_string()))?
    {
        if line.trim().is_empty() {
            continue;
        }
        // Wait for each event so replies print in order
        wait_for_event(spawn_event(dispatcher.clone(), adapter.message_event(&line))).await;
    }
    Ok(())
}

fn init_config() -> Result<(), serde_yaml::Error> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

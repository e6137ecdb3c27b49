use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use herald_bot::application::commands;
use herald_bot::application::errors::ConfigError;
use herald_bot::application::messaging::{CooldownTracker, MessageDispatcher};
use herald_bot::infrastructure::adapters::console::ConsoleAdapter;
use herald_bot::infrastructure::adapters::discord::run_discord_bot;
use herald_bot::infrastructure::config::{resolve_token, Config, Secrets};
use herald_bot::infrastructure::logging;

#[derive(Parser)]
#[command(name = "herald-bot")]
#[command(about = "A prefix-command chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Secrets file path
    #[arg(short, long, default_value = "secrets.json")]
    secrets: String,

    /// Bot token (overrides secrets file and TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and start handling commands
    Run,
    /// Handle commands typed on stdin (dev mode)
    Console {
        /// Treat input as direct messages
        #[arg(long)]
        dm: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Version => {
            println!("herald-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
        Commands::Run => {
            run_bot(&cli, None);
        }
        Commands::Console { dm } => {
            run_bot(&cli, Some(*dm));
        }
    }
}

/// Load the config file if present, falling back to defaults plus environment
fn load_config(path: &str) -> (Config, Option<ConfigError>) {
    if !Path::new(path).exists() {
        return (Config::load_env(), None);
    }
    match Config::load(path) {
        Ok(mut config) => {
            config.apply_env();
            (config, None)
        }
        Err(e) => (Config::load_env(), Some(e)),
    }
}

/// `console` is `Some(direct)` for the console adapter, `None` for Discord
fn run_bot(cli: &Cli, console: Option<bool>) {
    let (config, load_error) = load_config(&cli.config);

    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(e) = load_error {
        tracing::warn!("Failed to load config: {}, using defaults", e);
    }
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return;
    }

    tracing::info!("Starting {}", config.bot.name);

    let secrets = Secrets::resolve(&cli.secrets);

    let registry = Arc::new(commands::builtin_registry());
    let cooldowns = Arc::new(CooldownTracker::new());
    let dispatcher = MessageDispatcher::new(&config.bot.prefix, registry, cooldowns)
        .with_default_cooldown(config.default_cooldown());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return;
        }
    };

    match console {
        Some(direct) => {
            let dispatcher = Arc::new(dispatcher.with_secrets(Arc::new(secrets)));
            let adapter = if direct {
                ConsoleAdapter::new().direct()
            } else {
                ConsoleAdapter::new()
            };
            if let Err(e) = rt.block_on(adapter.run(dispatcher)) {
                tracing::error!("Console bot stopped: {}", e);
            }
        }
        None => {
            let token = match resolve_token(&secrets, cli.token.as_deref()) {
                Ok(token) => token,
                Err(e) => {
                    tracing::error!("No Discord token provided.");
                    tracing::debug!("Token resolution failed: {}", e);
                    return;
                }
            };
            let dispatcher = Arc::new(dispatcher.with_secrets(Arc::new(secrets)));
            if let Err(e) = rt.block_on(run_discord_bot(&token, dispatcher)) {
                tracing::error!("Discord client stopped: {}", e);
            }
        }
    }
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => eprintln!("Failed to render default config: {}", e),
    }
}

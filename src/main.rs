use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinview::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the raw price feed (live, or the fallback dataset)
    Raw,
    /// Show the Bitcoin price board with local currency names
    Price {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage the currency reference table
    Currencies {
        #[command(subcommand)]
        command: CurrencyCommands,
    },
}

#[derive(Subcommand)]
enum CurrencyCommands {
    /// List all currencies
    List,
    /// Show a single currency
    Get { code: String },
    /// Add a currency with its Chinese display name
    Add { code: String, name: String },
    /// Rename an existing currency
    Update { code: String, name: String },
    /// Remove a currency
    Remove { code: String },
}

impl From<Commands> for coinview::AppCommand {
    fn from(cmd: Commands) -> coinview::AppCommand {
        match cmd {
            Commands::Raw => coinview::AppCommand::Raw,
            Commands::Price { json } => coinview::AppCommand::Price { json },
            Commands::Currencies { command } => match command {
                CurrencyCommands::List => coinview::AppCommand::CurrencyList,
                CurrencyCommands::Get { code } => coinview::AppCommand::CurrencyGet { code },
                CurrencyCommands::Add { code, name } => {
                    coinview::AppCommand::CurrencyAdd { code, name }
                }
                CurrencyCommands::Update { code, name } => {
                    coinview::AppCommand::CurrencyUpdate { code, name }
                }
                CurrencyCommands::Remove { code } => {
                    coinview::AppCommand::CurrencyRemove { code }
                }
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => coinview::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = coinview::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Field-encryption material: key must be 32 bytes, iv 16 bytes.
# Replace both before storing real data.
crypto:
  key: "0123456789abcdef0123456789abcdef"
  iv: "abcdef9876543210"

feed:
  base_url: "https://api.coindesk.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

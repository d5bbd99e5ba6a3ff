//! snip: snipcrypt client CLI
//!
//! Commands:
//!   save [FILE]        - seal a snippet (from FILE or stdin) and upload it,
//!                        printing the passphrase identifier
//!   load <IDENTIFIER>  - fetch and open the snippet behind a passphrase
//!   phrase             - generate a passphrase without saving anything
//!   config show        - display the merged active configuration
//!
//! The passphrase printed by `save` is the only way back to the snippet;
//! neither the API nor the object store can recover it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use snip_core::config::SnipConfig;
use snip_core::{SnippetMetadata, SnippetModel};
use snip_transport::E2eService;

#[derive(Parser, Debug)]
#[command(
    name = "snip",
    version,
    about = "End-to-end encrypted snippet sharing",
    long_about = "snip: seal text snippets client-side and address them by a human-memorable passphrase"
)]
struct Cli {
    /// Path to snip.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "SNIP_CONFIG",
        default_value = "~/.config/snip/snip.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SNIP_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "SNIP_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seal a snippet and upload it, printing the passphrase identifier
    Save {
        /// File to read the snippet from (stdin if omitted)
        file: Option<PathBuf>,

        /// Keep the snippet beyond the default ephemeral lifetime
        /// (3-word passphrase instead of 2)
        #[arg(long)]
        prolonged: bool,

        /// Syntax-highlighting hint stored in the snippet metadata
        #[arg(long, default_value = "plaintext")]
        language: String,
    },

    /// Fetch and open the snippet behind a passphrase identifier
    Load {
        /// Passphrase identifier, e.g. AliceBob
        identifier: String,
    },

    /// Generate a passphrase without saving anything
    Phrase {
        /// Number of words (2 = ephemeral shape, 3 = prolonged shape)
        #[arg(long, default_value_t = 2)]
        words: usize,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, &cli.log_format);

    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Save {
            file,
            prolonged,
            language,
        } => {
            let data = read_input(file.as_deref()).await?;
            let ephemeral = !prolonged;

            let service = E2eService::new(&config);
            service.init_save(ephemeral);

            let snippet = SnippetModel {
                metadata: SnippetMetadata {
                    // Filled in from the derived stack during save.
                    id: String::new(),
                    language,
                    ephemeral,
                },
                data,
            };

            let identifier = service.save(snippet).await?;
            info!(ephemeral, "saved");
            println!("{identifier}");
        }

        Commands::Load { identifier } => {
            let service = E2eService::new(&config);
            let snippet = service.load(&identifier).await?;
            print!("{}", snippet.data);
        }

        Commands::Phrase { words } => {
            println!("{}", snip_crypto::generate_passphrase(words));
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}

async fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

async fn load_config(path: &PathBuf) -> Result<SnipConfig> {
    let expanded = expand_home(path);
    if expanded.exists() {
        let content = tokio::fs::read_to_string(&expanded)
            .await
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", expanded.display()))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", expanded.display()))
    } else {
        tracing::debug!(
            "config file not found: {}  (using defaults)",
            expanded.display()
        );
        Ok(SnipConfig::default())
    }
}

fn expand_home(path: &PathBuf) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.clone()
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

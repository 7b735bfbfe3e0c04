//! Registry server binary

use clap::{Parser, Subcommand};
use minipatient::{Config, RegistryServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minipatient")]
#[command(about = "In-memory patient registry over HTTP", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the registry server
    Serve {
        /// Config file (defaults to ./minipatient.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Route prefixes (repeatable or comma-separated)
        #[arg(long = "prefix", value_delimiter = ',')]
        prefixes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            prefixes,
        } => {
            // File and environment first, CLI arguments have priority
            let mut config = Config::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if !prefixes.is_empty() {
                config.route_prefixes = prefixes;
            }

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| config.log_level.as_str().into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            RegistryServer::new(config).serve().await?;
        }
    }

    Ok(())
}

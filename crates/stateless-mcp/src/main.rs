//! Stateless MCP server: entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use stateless_mcp::config::load_config;
use stateless_mcp::types::InitializeResult;
use stateless_mcp::{HttpTransport, ProtocolHandler, Registry};

#[derive(Parser)]
#[command(
    name = "stateless-mcp",
    about = "Stateless MCP server over streamable HTTP with bearer-token auth",
    version
)]
struct Cli {
    /// Configuration file path (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the protocol over HTTP (default).
    Serve {
        /// Listen address, overriding the configuration file.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Print server info and registered capabilities as JSON.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(Registry::with_builtins()?);

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            tracing::debug!(?config, "Resolved configuration");

            let handler = ProtocolHandler::new(registry);
            let transport = HttpTransport::new(handler, &config);
            transport.run(&config.addr).await?;
        }

        Commands::Info => {
            let init = InitializeResult::default_result();
            let info = serde_json::json!({
                "server": init.server_info,
                "protocol_version": init.protocol_version,
                "capabilities": init.capabilities,
                "tools": registry.tools().map(|t| &t.definition.name).collect::<Vec<_>>(),
                "prompts": registry.prompts().map(|p| &p.definition.name).collect::<Vec<_>>(),
                "resources": registry.resources().map(|r| &r.definition.uri).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

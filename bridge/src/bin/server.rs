use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use listenhub_bridge::{build_server, serve_http, serve_stdio, Transport};
use listenhub_core::ListenHubConfig;

const DEFAULT_LOG_FILTER: &str = "info,listenhub_core=info,listenhub_bridge=info";

/// ListenHub MCP server
#[derive(Parser, Debug)]
#[command(name = "listenhub-mcp-server", version, about)]
struct Cli {
    /// stdio or http
    #[arg(long, env = "TRANSPORT", default_value = "stdio")]
    transport: Transport,

    /// Port of the HTTP transport
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Bind address of the HTTP transport
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// TOML config file (defaults to LISTENHUB_CONFIG, then ./listenhub.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => ListenHubConfig::load_from(Some(path))?,
        None => ListenHubConfig::load()?,
    };
    let server = build_server(&config)?;

    tracing::info!(
        transport = %cli.transport,
        version = env!("CARGO_PKG_VERSION"),
        "Starting ListenHub MCP server"
    );

    match cli.transport {
        Transport::Stdio => serve_stdio(server).await?,
        Transport::Http => {
            let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
            serve_http(server, addr).await?
        }
    }
    Ok(())
}

//! CLI parser and command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::server;
use crate::services::{CrawlRunner, CrawlService};

#[derive(Parser)]
#[command(name = "tenders")]
#[command(about = "Tender listing crawler and extraction service")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl tenders once and write the CSV table
    Crawl {
        /// How many of the latest tenders to extract
        #[arg(short, long, default_value = "10")]
        max: usize,
        /// Output file (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the HTTP server
    Serve {
        /// Bind address: a port, a host, or host:port
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Crawl { max, output } => cmd_crawl(&settings, max, output).await,
        Commands::Serve { bind } => cmd_serve(settings, &bind).await,
    }
}

async fn cmd_crawl(settings: &Settings, max: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| settings.output_path.clone());
    let service = CrawlService::new(settings.clone());
    let path = service.run(max, &output).await?;
    println!("Results written to {}", path.display());
    Ok(())
}

async fn cmd_serve(settings: Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind, settings.server_port);
    println!("Starting tender server at http://{}:{}", host, port);
    println!("  Press Ctrl+C to stop");

    server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:<default>
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str, default_port: u16) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("127.0.0.1".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), default_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_accepts_port_host_and_both() {
        assert_eq!(
            parse_bind_address("3030", 8000),
            ("127.0.0.1".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0", 8000),
            ("0.0.0.0".to_string(), 8000)
        );
        assert_eq!(
            parse_bind_address("10.0.0.5:9001", 8000),
            ("10.0.0.5".to_string(), 9001)
        );
    }
}

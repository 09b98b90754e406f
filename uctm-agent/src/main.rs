//! UCTM Agent - special agent for UCTM network appliances
//!
//! Performs one stateless collection pass against a device:
//! - polls the fixed set of REST endpoints over HTTPS (POST, empty body)
//! - repairs the malformed JSON some firmware versions emit
//! - writes each successful section as a self-delimited block on stdout
//!
//! Individual endpoint failures only drop their section from the output;
//! the process itself exits 0 as long as the pass ran. Diagnostics go to
//! stderr so stdout stays a clean data channel.

mod api;
mod collector;
mod repair;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use api::UctmClient;

#[derive(Parser, Debug)]
#[command(name = "uctm-agent")]
#[command(about = "Collect monitoring data from a UCTM appliance", long_about = None)]
struct Cli {
    /// Hostname or IP address of the appliance
    #[arg(short = 'H', long)]
    host: String,

    /// HTTPS port of the REST API
    #[arg(short, long, default_value_t = 443)]
    port: u16,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Verify the device TLS certificate (self-signed certs fail with this on)
    #[arg(long)]
    verify_ssl: bool,

    /// Verbose diagnostic output on stderr
    #[arg(long)]
    debug: bool,

    /// Comma-separated list of sections to collect (default: all)
    #[arg(long)]
    sections: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting collection pass against {}:{}", cli.host, cli.port);

    let client = UctmClient::new(&cli.host, cli.port, cli.verify_ssl, cli.timeout)
        .context("Failed to create API client")?;

    let specs = collector::select_sections(cli.sections.as_deref());

    let mut stdout = std::io::stdout().lock();
    collector::collect(&client, &specs, &mut stdout)
        .await
        .context("Failed to write agent output")?;

    Ok(())
}

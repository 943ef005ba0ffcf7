use anyhow::Context;
use clap::Parser;
use posture_core::client::AccountFixture;
use posture_core::{default_checks, FixtureAuditClient};
use posture_metrics::{serve, Collector, GaugeBoard};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, Level};
use tracing_subscriber;

#[derive(Parser)]
#[command(name = "posture-exporter")]
#[command(about = "Cloud security posture exporter for Prometheus", long_about = None)]
#[command(version)]
struct Cli {
    /// Port for the /metrics and /healthz endpoints
    #[arg(short, long, default_value_t = 9100, env = "POSTURE_EXPORTER_PORT")]
    port: u16,

    /// Delay between collection cycles (e.g. 60s, 5m)
    #[arg(short, long, default_value = "60s", env = "POSTURE_EXPORTER_INTERVAL")]
    interval: humantime::Duration,

    /// Path to an account fixture file (JSON)
    #[arg(short, long)]
    fixture: PathBuf,

    /// Page size for identity and key listings
    #[arg(long, default_value_t = 100)]
    page_size: usize,

    /// Run a single collection cycle, print the metrics, and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let raw = std::fs::read_to_string(&cli.fixture)
        .with_context(|| format!("reading fixture file {}", cli.fixture.display()))?;
    let fixture: AccountFixture = serde_json::from_str(&raw)
        .with_context(|| format!("parsing fixture file {}", cli.fixture.display()))?;

    let client = Arc::new(FixtureAuditClient::new(fixture).with_page_size(cli.page_size));
    let board = Arc::new(GaugeBoard::new());
    let collector = Collector::new(default_checks(client), board.clone())?;

    if cli.once {
        collector.run_cycle().await;
        print!("{}", board.encode());
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let server_board = board.clone();
    tokio::spawn(async move {
        if let Err(err) = serve(server_board, addr).await {
            error!("Metrics server failed: {}", err);
            std::process::exit(1);
        }
    });

    collector.run(Duration::from(cli.interval)).await;

    Ok(())
}

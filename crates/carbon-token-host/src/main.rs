mod config;
mod runner;
mod script;

use clap::Parser;
use config::DeploymentConfig;
use runner::Host;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;

/// Deploy a carbon-credit token, replay a call script against it and export
/// the resulting event log.
#[derive(Debug, Parser)]
#[command(name = "carbon-token-host", version)]
struct Cli {
    /// Deployment config (token metadata, policy, genesis).
    #[arg(long)]
    config: PathBuf,

    /// JSON array of calls to replay after genesis.
    #[arg(long)]
    script: Option<PathBuf>,

    /// First event sequence number to export.
    #[arg(long, default_value_t = 0)]
    events_from: u64,

    /// Print the Prometheus exposition after the run.
    #[arg(long)]
    metrics: bool,

    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(level: Level, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.log_json);

    let deployment = DeploymentConfig::load(&cli.config)?;
    let calls = match &cli.script {
        Some(path) => script::load(path)?,
        None => Vec::new(),
    };

    let mut host = Host::deploy(deployment)?;
    let report = host.run(&calls);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    host.export(&mut out, cli.events_from, &report)?;
    if cli.metrics {
        // Keeps stdout line-delimited JSON when metrics are also requested.
        eprint!("{}", host.render_metrics()?);
    }
    out.flush()?;
    Ok(())
}

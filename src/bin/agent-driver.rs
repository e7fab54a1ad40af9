//! agentlink Script Driver
//!
//! Replays a JSONL script against an agent.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use agentlink::config::DEFAULT_AGENT_ADDR;
use agentlink::script::{self, ScriptRunner};
use agentlink::{AgentClient, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// agentlink script driver
#[derive(Parser, Debug)]
#[command(name = "agent-driver")]
#[command(about = "Replay a JSONL script against a UI-automation agent")]
#[command(version)]
struct Args {
    /// Path to the JSONL driver script
    #[arg(short, long)]
    script: PathBuf,

    /// Agent address (tcp:host:port)
    #[arg(short, long, env = "FLUFFYUI_AGENT_ADDR", default_value = DEFAULT_AGENT_ADDR)]
    addr: String,

    /// Agent token, if the agent requires one
    #[arg(short, long, env = "FLUFFYUI_AGENT_TOKEN", default_value = "")]
    token: String,

    /// Keep retrying the connection for this many milliseconds
    #[arg(long, default_value = "5000")]
    dial_timeout_ms: u64,

    /// Extra delay before dialing the agent, in milliseconds
    #[arg(long, default_value = "0")]
    startup_delay_ms: u64,

    /// Trace every frame
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "info,agentlink=trace"
    } else {
        "info,agentlink=debug"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::builder()
        .agent_addr(&args.addr)
        .dial_retry_ms(args.dial_timeout_ms)
        .build();

    if args.startup_delay_ms > 0 {
        thread::sleep(Duration::from_millis(args.startup_delay_ms));
    }

    let mut client = AgentClient::connect_with_config(&config)?;
    tracing::info!("Connected to {}", client.address());

    let token = Some(args.token.as_str()).filter(|t| !t.is_empty());
    script::hello(&mut client, token)?;

    let summary = ScriptRunner::new(&mut client).run_file(&args.script)?;
    tracing::info!(
        "Script finished: {} steps, {} requests",
        summary.steps,
        summary.requests
    );

    client.close()
}

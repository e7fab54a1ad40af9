//! agentlink Demo Binary
//!
//! Connects to an agent and runs a fixed command sequence, printing each
//! response as one JSON line.

use std::thread;
use std::time::Duration;

use clap::Parser;
use agentlink::config::DEFAULT_AGENT_ADDR;
use agentlink::{AgentClient, Config, Request};
use tracing_subscriber::{fmt, EnvFilter};

/// agentlink demo
#[derive(Parser, Debug)]
#[command(name = "agent-demo")]
#[command(about = "Drive a UI-automation agent through a short demo sequence")]
#[command(version)]
struct Args {
    /// Agent address (tcp:host:port)
    #[arg(short, long, env = "FLUFFYUI_AGENT_ADDR", default_value = DEFAULT_AGENT_ADDR)]
    addr: String,

    /// Pause between commands in milliseconds
    #[arg(short, long, default_value = "200")]
    pause_ms: u64,

    /// Read timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,agentlink=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("agentlink demo v{}", agentlink::VERSION);
    tracing::info!("Agent address: {}", args.addr);

    let config = Config::builder()
        .agent_addr(&args.addr)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    let mut client = match AgentClient::connect_with_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    let steps = [
        Request::hello(client.next_id(), None),
        Request::snapshot(client.next_id(), true),
        Request::text(client.next_id(), "hello from agent"),
        Request::key(client.next_id(), "enter"),
        Request::snapshot(client.next_id(), true),
    ];

    let pause = Duration::from_millis(args.pause_ms);
    let last = steps.len() - 1;
    for (index, request) in steps.into_iter().enumerate() {
        match client.call(request) {
            Ok(response) => println!("{}", response),
            Err(e) => {
                tracing::error!("Call failed: {}", e);
                std::process::exit(1);
            }
        }
        if index < last {
            thread::sleep(pause);
        }
    }

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }
}

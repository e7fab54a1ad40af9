//! # agentlink
//!
//! A minimal client for driving a remote UI-automation agent:
//! - Address parsing (`["tcp:"] host ":" port`, `unix:` rejected)
//! - One TCP connection per session, closed exactly once
//! - Newline-delimited JSON framing
//! - Strict one-request-one-response calls
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Driver (demo / JSONL script)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  call(Request) -> Response
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      AgentClient                             │
//! │              (Open ──► Closed state machine)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Codec     │          │ Connection  │
//!   │ (JSON + \n) │          │ (TcpStream) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Remote agent│
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use agentlink::{address, AgentClient, Config, Request};
//!
//! # fn main() -> agentlink::Result<()> {
//! let config = Config::default();
//! let addr = address::parse("tcp:127.0.0.1:7777")?;
//! let mut client = AgentClient::connect(&addr, &config)?;
//! let response = client.call(Request::hello(1, None))?;
//! println!("{}", response);
//! client.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod address;
pub mod protocol;
pub mod network;
pub mod script;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AgentError, Result};
pub use config::Config;
pub use address::Address;
pub use protocol::{Request, Response};
pub use network::{AgentClient, SharedClient};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of agentlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

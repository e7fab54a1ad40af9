//! Network Module
//!
//! TCP client for the agent.
//!
//! ## Architecture
//! - One connection per client, opened once, closed exactly once
//! - Strict half-duplex: one request frame, then exactly one response line
//! - Any failed call tears the connection down; later calls fail fast
//!
//! ## Client State Machine
//! ```text
//!   connect() ──► Open ──call()──► Open
//!                  │
//!                  ├── close() ─────────────► Closed
//!                  └── call() fails ────────► Closed
//!
//!   Closed ──call()──► Err(ClosedConnection)
//! ```

mod client;
mod connection;
mod shared;

pub use client::AgentClient;
pub use connection::Connection;
pub use shared::SharedClient;

//! Error types for agentlink
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using AgentError
pub type Result<T> = std::result::Result<T, AgentError>;

/// Unified error type for agentlink operations
#[derive(Debug, Error)]
pub enum AgentError {
    // -------------------------------------------------------------------------
    // Address Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Connection already closed")]
    ClosedConnection,

    #[error("Timed out waiting for the agent")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response exceeds {limit} bytes without a line terminator")]
    ResponseTooLarge { limit: usize },

    #[error("Response id {actual} does not match request id {expected}")]
    ResponseIdMismatch {
        expected: serde_json::Value,
        actual: serde_json::Value,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Agent rejected request: {code} {message}")]
    Rejected { code: String, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Script Errors
    // -------------------------------------------------------------------------
    #[error("Invalid script step: {0}")]
    InvalidStep(String),

    #[error("Timed out waiting for label {0:?}")]
    LabelNotFound(String),

    #[error("Script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<AgentError>,
    },
}

impl AgentError {
    /// Classify a transport error raised while a call was in flight.
    ///
    /// Peer hang-ups become `ConnectionClosed`, expired deadlines become
    /// `Timeout`, everything else stays a plain `Io`.
    pub(crate) fn from_transport(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => AgentError::ConnectionClosed,
            // Unix reports an expired SO_RCVTIMEO as WouldBlock, Windows as TimedOut
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => AgentError::Timeout,
            _ => AgentError::Io(err),
        }
    }

    /// Whether this error came from the peer going away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, AgentError::ConnectionClosed)
    }
}

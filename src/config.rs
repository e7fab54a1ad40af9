//! Configuration for agentlink
//!
//! Centralized configuration with sensible defaults. Values are always passed
//! in explicitly; nothing here reads the process environment.

use std::time::Duration;

use crate::error::{AgentError, Result};

/// Default agent address used by the binaries
pub const DEFAULT_AGENT_ADDR: &str = "tcp:127.0.0.1:7777";

/// Main configuration for an agent client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Raw agent address, `["tcp:"] host ":" port`
    pub agent_addr: String,

    // -------------------------------------------------------------------------
    // Connect Configuration
    // -------------------------------------------------------------------------
    /// Per-attempt connect deadline (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Total window to keep retrying connection attempts (milliseconds).
    /// 0 means a single attempt.
    pub dial_retry_ms: u64,

    // -------------------------------------------------------------------------
    // Transport Deadlines
    // -------------------------------------------------------------------------
    /// Read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Longest response line accepted, terminator included
    pub max_response_bytes: usize,

    /// Fail a call when the response carries an `id` different from the request's
    pub verify_response_ids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_addr: DEFAULT_AGENT_ADDR.to_string(),
            connect_timeout_ms: 5000,
            dial_retry_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_response_bytes: 16 * 1024 * 1024, // 16 MB
            verify_response_ids: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    pub(crate) fn dial_retry(&self) -> Duration {
        Duration::from_millis(self.dial_retry_ms)
    }

    /// Reject values the client cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.agent_addr.trim().is_empty() {
            return Err(AgentError::Config("agent address is required".to_string()));
        }
        if self.max_response_bytes == 0 {
            return Err(AgentError::Config(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the raw agent address
    pub fn agent_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.agent_addr = addr.into();
        self
    }

    /// Set the per-attempt connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Keep retrying the connection for this long (in milliseconds)
    pub fn dial_retry_ms(mut self, ms: u64) -> Self {
        self.config.dial_retry_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the maximum accepted response line length (in bytes)
    pub fn max_response_bytes(mut self, bytes: usize) -> Self {
        self.config.max_response_bytes = bytes;
        self
    }

    /// Enable or disable response id verification
    pub fn verify_response_ids(mut self, enabled: bool) -> Self {
        self.config.verify_response_ids = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_no_deadline() {
        let config = Config::builder().read_timeout_ms(0).write_timeout_ms(250).build();
        assert_eq!(config.read_timeout(), None);
        assert_eq!(config.write_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_validate_rejects_empty_address() {
        let config = Config::builder().agent_addr("   ").build();
        assert!(matches!(config.validate(), Err(AgentError::Config(_))));
        assert!(Config::default().validate().is_ok());
    }
}

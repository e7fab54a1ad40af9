//! Agent Client
//!
//! Blocking request/response client over a single connection.

use serde_json::Value;

use crate::address::{self, Address};
use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::protocol::{Request, Response};
use super::Connection;

enum State {
    Open(Connection),
    Closed,
}

/// Client for one agent session
///
/// Calls are strictly one-in-one-out: `call` writes a frame and does not
/// return until the matching line has been read. A client is not meant to be
/// shared between threads without a lock; see [`super::SharedClient`].
pub struct AgentClient {
    state: State,

    /// Target address, kept for logging
    address: Address,

    /// Longest response line accepted
    max_response_bytes: usize,

    /// Fail calls whose response id differs from the request id
    verify_response_ids: bool,

    /// Next id handed out by `request`
    next_id: u64,
}

impl AgentClient {
    /// Connect to an already-parsed address
    ///
    /// The config is validated before any connection attempt is made.
    pub fn connect(address: &Address, config: &Config) -> Result<Self> {
        config.validate()?;
        let connection = Connection::open(address, config)?;
        Self::from_connection(address.clone(), connection, config)
    }

    /// Wrap an already-open connection
    pub fn from_connection(address: Address, connection: Connection, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: State::Open(connection),
            address,
            max_response_bytes: config.max_response_bytes,
            verify_response_ids: config.verify_response_ids,
            next_id: 1,
        })
    }

    /// Parse `config.agent_addr` and connect
    ///
    /// An invalid address fails before any connection attempt is made.
    pub fn connect_with_config(config: &Config) -> Result<Self> {
        let address = address::parse(&config.agent_addr)?;
        Self::connect(&address, config)
    }

    /// Send `request` and block until its response line arrives
    ///
    /// Any failure closes the connection; later calls return
    /// [`AgentError::ClosedConnection`] without writing anything.
    pub fn call(&mut self, request: Request) -> Result<Response> {
        let limit = self.max_response_bytes;
        let verify = self.verify_response_ids;
        let outcome = match &mut self.state {
            State::Open(connection) => {
                track_id(&mut self.next_id, &request);
                exchange(connection, &request, limit, verify)
            }
            State::Closed => return Err(AgentError::ClosedConnection),
        };

        if outcome.is_err() {
            tracing::debug!(
                "Call {:?} failed, dropping connection to {}",
                request.kind(),
                self.address
            );
            self.teardown();
        }

        outcome
    }

    /// Start a request of type `kind` with the next session id
    pub fn request(&mut self, kind: &str) -> Request {
        Request::new(self.next_id(), kind)
    }

    /// Reserve the next request id (ids start at 1)
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Close the connection
    ///
    /// Safe to call more than once; only the first call touches the socket.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(connection) => {
                tracing::debug!("Closing connection to {}", connection.peer_addr());
                connection.shutdown()
            }
            State::Closed => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Remote socket address, while open
    pub fn peer_addr(&self) -> Option<&str> {
        match &self.state {
            State::Open(connection) => Some(connection.peer_addr()),
            State::Closed => None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    fn teardown(&mut self) {
        if let Err(e) = self.close() {
            tracing::trace!("Shutdown after failed call: {}", e);
        }
    }
}

impl Drop for AgentClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Keep automatic ids ahead of any explicit numeric id the caller used
fn track_id(next_id: &mut u64, request: &Request) {
    if let Some(id) = request.id().and_then(Value::as_u64) {
        if id >= *next_id {
            *next_id = id.saturating_add(1);
        }
    }
}

fn exchange(
    connection: &mut Connection,
    request: &Request,
    limit: usize,
    verify_ids: bool,
) -> Result<Response> {
    connection.send(request)?;
    let response = connection.receive(limit)?;
    if verify_ids {
        check_response_id(request, &response)?;
    }
    Ok(response)
}

/// Responses without an `id` (e.g. `bad_json` replies) are accepted as-is
fn check_response_id(request: &Request, response: &Response) -> Result<()> {
    match (request.id(), response.id()) {
        (Some(expected), Some(actual)) if expected != actual => {
            Err(AgentError::ResponseIdMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
            })
        }
        _ => Ok(()),
    }
}

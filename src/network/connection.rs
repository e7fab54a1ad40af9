//! Connection Handler
//!
//! Owns the socket to the agent and moves frames across it.

use std::io::{self, BufReader};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use crate::address::Address;
use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::protocol::{read_response, write_request, Request, Response};

/// Pause between connection attempts while the dial retry window is open
const DIAL_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// A single connection to the agent
pub struct Connection {
    /// Receive side, buffered; the only reader of the socket
    reader: BufReader<TcpStream>,

    /// Send side; frames are built contiguously so no buffer is needed
    writer: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Open a connection to `address`
    ///
    /// Tries every resolved socket address in turn. When the config allows a
    /// dial retry window the whole attempt is repeated until it expires.
    pub fn open(address: &Address, config: &Config) -> Result<Self> {
        let deadline = Instant::now() + config.dial_retry();
        let stream = loop {
            match Self::dial_once(address, config.connect_timeout()) {
                Ok(stream) => break stream,
                Err(source) if Instant::now() >= deadline => {
                    return Err(AgentError::Connection {
                        addr: address.to_string(),
                        source,
                    })
                }
                Err(e) => {
                    tracing::trace!("Dial {} failed, retrying: {}", address, e);
                    thread::sleep(DIAL_RETRY_INTERVAL);
                }
            }
        };

        Self::from_stream(stream, config)
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm: every frame is a complete request
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;

        tracing::debug!("Connected to agent at {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: stream,
            peer_addr,
        })
    }

    fn dial_once(address: &Address, timeout: Option<Duration>) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in address.resolve()? {
            match Self::connect_addr(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
        }))
    }

    fn connect_addr(addr: &SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
        match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        }
    }

    /// Send one request frame, flushed before returning
    pub fn send(&mut self, request: &Request) -> Result<()> {
        write_request(&mut self.writer, request)?;
        tracing::trace!("-> {}: {}", self.peer_addr, request.kind());
        Ok(())
    }

    /// Block until one response line arrives
    pub fn receive(&mut self, limit: usize) -> Result<Response> {
        let response = read_response(&mut self.reader, limit)?;
        tracing::trace!("<- {}: {}", self.peer_addr, response);
        Ok(response)
    }

    /// Shut down both directions of the socket
    ///
    /// A peer that already went away is not an error here.
    pub fn shutdown(&self) -> Result<()> {
        match self.writer.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(AgentError::Io(e)),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

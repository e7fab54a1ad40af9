//! Fake agent for integration tests.
//!
//! Accepts a single TCP connection on an ephemeral port, reads request lines
//! and answers each one according to a handler closure. Every received line
//! is reported over a channel so tests can inspect what hit the wire.

#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use agentlink::{Address, Config};
use crossbeam::channel::{unbounded, Receiver};
use serde_json::Value;

/// How the fake agent answers one request
pub enum Reply {
    /// Write this line followed by `\n`
    Line(String),
    /// Write the request line back unchanged
    Echo,
    /// Write these bytes verbatim
    Raw(Vec<u8>),
    /// Write these bytes, then close the connection
    Truncated(Vec<u8>),
    /// Close the connection without answering
    Close,
    /// Keep the connection open and never answer
    Silent,
}

/// One request line as seen by the agent
#[derive(Debug, Clone)]
pub struct Received {
    /// Raw line, terminator included
    pub line: String,
    /// Whether more bytes were already waiting when the agent looked
    pub pipelined: bool,
}

impl Received {
    pub fn json(&self) -> Value {
        serde_json::from_str(self.line.trim_end()).expect("request line is JSON")
    }
}

pub struct FakeAgent {
    port: u16,
    received: Receiver<Received>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeAgent {
    pub fn spawn<F>(handler: F) -> Self
    where
        F: FnMut(&Value) -> Reply + Send + 'static,
    {
        Self::spawn_with_quiet(Duration::ZERO, handler)
    }

    /// Like `spawn`, but waits `quiet` after each request before checking
    /// whether the client sent anything else ahead of the reply.
    pub fn spawn_with_quiet<F>(quiet: Duration, mut handler: F) -> Self
    where
        F: FnMut(&Value) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind fake agent");
        let port = listener.local_addr().expect("local addr").port();
        let (tx, rx) = unbounded();

        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let _ = serve(stream, quiet, &mut handler, |received| {
                let _ = tx.send(received);
            });
        });

        Self {
            port,
            received: rx,
            handle: Some(handle),
        }
    }

    pub fn address(&self) -> Address {
        Address::new("127.0.0.1", self.port)
    }

    pub fn addr_string(&self) -> String {
        format!("tcp:127.0.0.1:{}", self.port)
    }

    pub fn config(&self) -> Config {
        Config::builder().agent_addr(self.addr_string()).build()
    }

    /// Wait for the next received request
    pub fn next_request(&self) -> Received {
        self.received
            .recv_timeout(Duration::from_secs(5))
            .expect("fake agent received a request")
    }

    /// Wait for the agent thread to finish and return every request it saw.
    ///
    /// The client side must be closed or dropped first.
    pub fn finish(mut self) -> Vec<Received> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("fake agent thread panicked");
        }
        self.received.try_iter().collect()
    }
}

fn serve<F, S>(stream: TcpStream, quiet: Duration, handler: &mut F, mut report: S) -> io::Result<()>
where
    F: FnMut(&Value) -> Reply,
    S: FnMut(Received),
{
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }

        if !quiet.is_zero() {
            thread::sleep(quiet);
        }
        let pipelined = !reader.buffer().is_empty() || has_pending(&writer)?;
        let request: Value = serde_json::from_str(line.trim_end()).unwrap_or(Value::Null);

        let reply = handler(&request);
        report(Received {
            line: line.clone(),
            pipelined,
        });

        match reply {
            Reply::Line(text) => {
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            Reply::Echo => writer.write_all(line.as_bytes())?,
            Reply::Raw(bytes) => writer.write_all(&bytes)?,
            Reply::Truncated(bytes) => {
                writer.write_all(&bytes)?;
                writer.flush()?;
                let _ = writer.shutdown(Shutdown::Both);
                return Ok(());
            }
            Reply::Close => {
                let _ = writer.shutdown(Shutdown::Both);
                return Ok(());
            }
            Reply::Silent => {}
        }
        writer.flush()?;
    }
}

fn has_pending(stream: &TcpStream) -> io::Result<bool> {
    stream.set_nonblocking(true)?;
    let mut peeked = [0u8; 1];
    let pending = match stream.peek(&mut peeked) {
        Ok(n) => n > 0,
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
        Err(e) => return Err(e),
    };
    stream.set_nonblocking(false)?;
    Ok(pending)
}

/// Reply `{"id":<id>,"ok":true}` to every request
pub fn ok_reply(request: &Value) -> Reply {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    Reply::Line(serde_json::json!({"id": id, "ok": true}).to_string())
}

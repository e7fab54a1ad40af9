//! Driver Scripts
//!
//! Runs a JSONL script of agent steps against a connected client.
//!
//! ## Script Format
//! One JSON object per line. Blank lines and `#` comments are skipped.
//!
//! | `type`       | Behavior                                                  |
//! |--------------|-----------------------------------------------------------|
//! | `sleep`      | pause `ms` (or `delay_ms`) milliseconds, nothing sent     |
//! | `wait_label` | poll `snapshot` until a widget matches `label`            |
//! | other        | sent as a request; the response must have `"ok": true`    |
//!
//! Any sent step may carry `delay_ms` to pause after its response.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::network::AgentClient;
use crate::protocol::{Request, Response};

/// Default `wait_label` timeout (milliseconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 2000;

/// Delay between snapshot polls in `wait_label`
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Open the session with a `hello`
///
/// Transport failures always fail, since they leave the client closed. A
/// response without `"ok": true` only fails when a token was supplied;
/// agents without authentication may not know the handshake.
pub fn hello(client: &mut AgentClient, token: Option<&str>) -> Result<Response> {
    let token = token.filter(|t| !t.is_empty());
    let request = Request::hello(client.next_id(), token);
    let response = client.call(request)?;
    if token.is_some() && !response.is_ok() {
        return Err(rejection(&response));
    }
    Ok(response)
}

/// What a finished script did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Steps executed (comments and blank lines excluded)
    pub steps: usize,

    /// Requests sent to the agent, snapshot polls included
    pub requests: usize,
}

/// Executes script steps against one client
pub struct ScriptRunner<'a> {
    client: &'a mut AgentClient,
    poll_interval: Duration,
    summary: ScriptSummary,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(client: &'a mut AgentClient) -> Self {
        Self {
            client,
            poll_interval: WAIT_POLL_INTERVAL,
            summary: ScriptSummary::default(),
        }
    }

    /// Override the `wait_label` poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run a script file
    pub fn run_file(self, path: impl AsRef<Path>) -> Result<ScriptSummary> {
        let file = File::open(path.as_ref())?;
        self.run(BufReader::new(file))
    }

    /// Run every step read from `reader`, stopping at the first failure
    pub fn run<R: BufRead>(mut self, reader: R) -> Result<ScriptSummary> {
        for (index, line) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            serde_json::from_str::<Value>(line)
                .map_err(|e| AgentError::InvalidStep(e.to_string()))
                .and_then(|step| self.run_step(step))
                .map_err(|source| AgentError::Script {
                    line: line_num,
                    source: Box::new(source),
                })?;
            self.summary.steps += 1;
        }
        Ok(self.summary)
    }

    fn run_step(&mut self, step: Value) -> Result<()> {
        let kind = step
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        match kind.as_str() {
            "sleep" => {
                let ms = int_value(&step, "ms", int_value(&step, "delay_ms", 0));
                pause(ms);
                Ok(())
            }
            "wait_label" => {
                let label = step
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| AgentError::InvalidStep("wait_label requires label".to_string()))?
                    .to_string();
                let timeout_ms = int_value(&step, "timeout_ms", DEFAULT_WAIT_TIMEOUT_MS);
                self.wait_for_label(&label, Duration::from_millis(timeout_ms))
            }
            _ => {
                let delay_ms = int_value(&step, "delay_ms", 0);
                let request = Request::from_value(step, self.client.next_id())?;
                let response = self.client.call(request)?;
                self.summary.requests += 1;

                if response.error().is_some() || !response.is_ok() {
                    return Err(rejection(&response));
                }
                pause(delay_ms);
                Ok(())
            }
        }
    }

    fn wait_for_label(&mut self, label: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let request = Request::snapshot(self.client.next_id(), false);
            let response = self.client.call(request)?;
            self.summary.requests += 1;
            if response.snapshot_has_label(label) {
                tracing::debug!("Label {:?} found", label);
                return Ok(());
            }
            thread::sleep(self.poll_interval);
        }
        Err(AgentError::LabelNotFound(label.to_string()))
    }
}

fn rejection(response: &Response) -> AgentError {
    AgentError::Rejected {
        code: response.error().unwrap_or("not_ok").to_string(),
        message: response.message().unwrap_or_default().to_string(),
    }
}

/// Read a non-negative integer field given as a number or numeric string
fn int_value(step: &Value, key: &str, fallback: u64) -> u64 {
    match step.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            s.trim().parse::<i64>().map(|v| v.max(0) as u64).unwrap_or(fallback)
        }
        _ => fallback,
    }
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

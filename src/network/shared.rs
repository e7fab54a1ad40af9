//! Shared Client
//!
//! Lets several threads drive one agent session. Each call holds the lock
//! for its full write+read, so frames from different threads never interleave.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::{Request, Response};
use super::AgentClient;

/// Cloneable, lock-guarded handle to an [`AgentClient`]
#[derive(Clone)]
pub struct SharedClient {
    inner: Arc<Mutex<AgentClient>>,
}

impl SharedClient {
    pub fn new(client: AgentClient) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Same contract as [`AgentClient::call`]
    pub fn call(&self, request: Request) -> Result<Response> {
        self.inner.lock().call(request)
    }

    /// Build a request with a fresh id and send it under a single lock hold
    pub fn call_kind<I, K, V>(&self, kind: &str, fields: I) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut client = self.inner.lock();
        let request = fields
            .into_iter()
            .fold(client.request(kind), |request, (key, value)| request.with(key, value));
        client.call(request)
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }
}

impl From<AgentClient> for SharedClient {
    fn from(client: AgentClient) -> Self {
        Self::new(client)
    }
}

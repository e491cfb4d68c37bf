//! Mock transports for testing.
//!
//! [`MockTransport`] answers API requests from canned per-route responses
//! and captures every request it sees. [`MockPushTransport`] hands out
//! scripted push connections and counts how many are open at once.

use super::{
    ApiRequest, ApiResponse, HttpTransport, Method, PushConnection, PushTransport, TransportError,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Route {
    Respond(ApiResponse),
    Fail(String),
}

/// Mock API transport for testing.
///
/// Routes not configured answer 404 with an empty body.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<ApiRequest>,
    fail_next_request: Option<String>,
    latency: Option<Duration>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with the given status and body from now on.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.routes.insert(
            (method, path.to_string()),
            Route::Respond(ApiResponse::new(status, body)),
        );
    }

    /// Make `method path` fail without a response from now on.
    pub fn fail(&self, method: Method, path: &str, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .routes
            .insert((method, path.to_string()), Route::Fail(error.to_string()));
    }

    /// Cause the next request, whatever its route, to fail with the given error.
    pub fn fail_next_request(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_request = Some(error.to_string());
    }

    /// Delay every answer by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = Some(latency);
    }

    /// Get all requests that were made.
    pub fn requests(&self) -> Vec<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Count requests made to `method path`.
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Clear all routes and captured requests.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let (route, latency) = {
            let mut inner = self.inner.lock().unwrap();
            let key = (request.method, request.path.clone());
            inner.requests.push(request);

            // Check for forced failure
            let route = match inner.fail_next_request.take() {
                Some(error) => Route::Fail(error),
                None => inner
                    .routes
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| Route::Respond(ApiResponse::new(404, ""))),
            };
            (route, inner.latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match route {
            Route::Respond(response) => Ok(response),
            Route::Fail(error) => Err(TransportError::ConnectionFailed(error)),
        }
    }
}

/// One step of a scripted push connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockPushEvent {
    /// Deliver a message body.
    Message(String),
    /// Fail the read with the given error.
    Fail(String),
    /// End the stream cleanly.
    End,
}

impl MockPushEvent {
    /// A message body.
    pub fn message(text: &str) -> Self {
        Self::Message(text.to_string())
    }
}

#[derive(Debug)]
enum Script {
    Connection(VecDeque<MockPushEvent>),
    Refuse(String),
}

/// Mock push transport for testing.
///
/// Each `open()` takes the next scripted connection. Once a connection has
/// played its script it stays open and silent. With no scripts left,
/// `open()` yields a silent connection.
#[derive(Debug, Default)]
pub struct MockPushTransport {
    inner: Arc<Mutex<MockPushInner>>,
}

#[derive(Debug, Default)]
struct MockPushInner {
    scripts: VecDeque<Script>,
    opened: usize,
    active: usize,
    max_active: usize,
}

impl MockPushTransport {
    /// Create a new mock push transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a connection that plays the given events.
    pub fn queue_connection(&self, events: Vec<MockPushEvent>) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripts.push_back(Script::Connection(events.into()));
    }

    /// Queue an `open()` that fails with the given error.
    pub fn queue_refusal(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripts.push_back(Script::Refuse(error.to_string()));
    }

    /// Number of successful `open()` calls.
    pub fn opened(&self) -> usize {
        self.inner.lock().unwrap().opened
    }

    /// Number of connections open right now.
    pub fn active(&self) -> usize {
        self.inner.lock().unwrap().active
    }

    /// Highest number of connections ever open at once.
    pub fn max_active(&self) -> usize {
        self.inner.lock().unwrap().max_active
    }
}

impl Clone for MockPushTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn open(&self) -> Result<Box<dyn PushConnection>, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        let events = match inner.scripts.pop_front() {
            Some(Script::Refuse(error)) => return Err(TransportError::ConnectionFailed(error)),
            Some(Script::Connection(events)) => events,
            None => VecDeque::new(),
        };

        inner.opened += 1;
        inner.active += 1;
        inner.max_active = inner.max_active.max(inner.active);

        Ok(Box::new(MockPushConnection {
            events,
            open: true,
            shared: Arc::clone(&self.inner),
        }))
    }
}

struct MockPushConnection {
    events: VecDeque<MockPushEvent>,
    open: bool,
    shared: Arc<Mutex<MockPushInner>>,
}

impl MockPushConnection {
    fn release(&mut self) {
        if self.open {
            self.open = false;
            let mut inner = self.shared.lock().unwrap();
            inner.active = inner.active.saturating_sub(1);
        }
    }
}

#[async_trait]
impl PushConnection for MockPushConnection {
    async fn next_message(&mut self) -> Result<Option<String>, TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        match self.events.pop_front() {
            Some(MockPushEvent::Message(text)) => Ok(Some(text)),
            Some(MockPushEvent::Fail(error)) => Err(TransportError::ReceiveFailed(error)),
            Some(MockPushEvent::End) => Ok(None),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.release();
    }
}

impl Drop for MockPushConnection {
    fn drop(&mut self) {
        self.release();
    }
}

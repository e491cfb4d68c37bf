//! Transport abstraction for autorec-sync.
//!
//! This module provides a pluggable transport layer that abstracts the raw
//! I/O primitives (reqwest over HTTP, mock for testing).
//!
//! # Design
//!
//! Two independent channels reach the server:
//! - [`HttpTransport::request`] performs one request/response exchange
//! - [`PushTransport::open`] opens the long-lived push stream, yielding a
//!   [`PushConnection`] that produces message bodies until it fails or ends
//!
//! Neither interprets status codes or message contents; that is the job of
//! the action runners and the stream client.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.respond(Method::Get, "recordings", 200, "[]");
//! let response = transport.request(ApiRequest::get("recordings")).await?;
//! assert!(response.is_success());
//! ```

mod http;
mod mock;
mod sse;

pub use http::{ReqwestPushTransport, ReqwestTransport};
pub use mock::{MockPushEvent, MockPushTransport, MockTransport};
pub use sse::SseDecoder;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// Connection closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Request timeout.
    #[error("request timed out")]
    Timeout,
}

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// One request to the server API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the server base URL, without a leading slash.
    pub path: String,
    /// JSON body, if any. `Some(Value::Null)` sends a literal `null`.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// The server's answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response transport to the server API.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status; `Err` means no response at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request.
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Opens push-stream connections.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open a new connection to the push stream.
    async fn open(&self) -> Result<Box<dyn PushConnection>, TransportError>;
}

/// One open push-stream connection.
#[async_trait]
pub trait PushConnection: Send {
    /// Wait for the next message body.
    ///
    /// Returns `Ok(None)` when the server ends the stream.
    async fn next_message(&mut self) -> Result<Option<String>, TransportError>;

    /// Close the connection. Further reads return an error.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builders() {
        let get = ApiRequest::get("recordings");
        assert_eq!(get.method, Method::Get);
        assert_eq!(get.body, None);

        let stop = ApiRequest::post("stop", serde_json::Value::Null);
        assert_eq!(stop.method, Method::Post);
        assert_eq!(stop.body, Some(serde_json::Value::Null));

        let delete = ApiRequest::delete("recordings/3");
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.path, "recordings/3");
    }

    #[test]
    fn success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::ConnectionFailed("refused".into()).to_string(),
            "connection failed: refused"
        );
    }
}

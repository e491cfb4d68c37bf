//! reqwest-backed transports.

use super::{
    ApiRequest, ApiResponse, HttpTransport, Method, PushConnection, PushTransport, SseDecoder,
    TransportError,
};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::{header, Client, Url};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::ConnectionFailed(err.to_string())
    }
}

fn join_url(base: &Url, path: &str) -> Result<Url, TransportError> {
    base.join(path)
        .map_err(|e| TransportError::ConnectionFailed(format!("invalid path {path:?}: {e}")))
}

/// API transport over reqwest.
///
/// Every request carries the configured timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport for the server at `base_url`.
    ///
    /// `base_url` must end with `/` for relative paths to resolve under it.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = join_url(&self.base_url, &request.path)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

/// Push-stream transport over a long-lived reqwest GET.
///
/// Only the connect phase is bounded by a timeout; an open stream may stay
/// idle indefinitely.
#[derive(Debug, Clone)]
pub struct ReqwestPushTransport {
    client: Client,
    url: Url,
}

impl ReqwestPushTransport {
    /// Create a transport for the stream at `path` under `base_url`.
    pub fn new(base_url: &Url, path: &str, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        let url = join_url(base_url, path)?;
        Ok(Self { client, url })
    }

    /// The stream URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PushTransport for ReqwestPushTransport {
    async fn open(&self) -> Result<Box<dyn PushConnection>, TransportError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::ConnectionFailed(format!(
                "push stream returned {status}"
            )));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(Box::new(ReqwestPushConnection {
            body: Some(body),
            decoder: SseDecoder::new(),
            ready: VecDeque::new(),
        }))
    }
}

struct ReqwestPushConnection {
    body: Option<BoxStream<'static, Result<Vec<u8>, reqwest::Error>>>,
    decoder: SseDecoder,
    ready: VecDeque<String>,
}

#[async_trait]
impl PushConnection for ReqwestPushConnection {
    async fn next_message(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            if let Some(message) = self.ready.pop_front() {
                return Ok(Some(message));
            }

            let body = self.body.as_mut().ok_or(TransportError::ConnectionClosed)?;
            match body.next().await {
                Some(Ok(chunk)) => self.ready.extend(self.decoder.feed(&chunk)),
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                None => {
                    self.body = None;
                    if self.decoder.finish() {
                        debug!("push stream ended inside an event; discarded");
                    }
                    return Ok(None);
                }
            }
        }
    }

    async fn close(&mut self) {
        self.body = None;
        self.ready.clear();
    }
}

//! HTTP transport capability.
//!
//! The pipeline needs exactly one thing from the HTTP stack: send a message,
//! get back a status code, the session-id header, and the body bytes. That
//! capability is a trait so tests can script replies; [`HttpTransport`] is
//! the reqwest-backed implementation used against a real daemon.

use std::future::Future;
use std::sync::Arc;

use crate::error::BoxError;

/// Header carrying the session token in both directions.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// One outbound RPC message, fully derived from a request descriptor and
/// the client state at send time.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The full RPC endpoint URL.
    pub url: String,
    /// The precomputed `Basic` Authorization value, if credentials are
    /// configured.
    pub authorization: Option<String>,
    /// The session token held when the message was built.
    pub session_id: Option<String>,
    /// The serialized JSON body.
    pub body: String,
}

/// The transport-level view of a reply.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The value of the session-id header, if the response carried one.
    pub session_id: Option<String>,
    /// The raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The capability the pipeline requires from an HTTP stack.
///
/// Implementations report network-level failures through the boxed error;
/// any reply that made it back, whatever its status code, is an `Ok`.
pub trait Transport: Send + Sync {
    /// Sends one message and resolves with the server's reply.
    ///
    /// # Errors
    ///
    /// Fails only when no reply came back at all; a reply with a failure
    /// status code is still `Ok`.
    fn send(&self, request: HttpRequest)
    -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).send(request).await
    }
}

/// Production transport backed by [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a caller-configured client, e.g. to control timeouts or TLS.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut outgoing = self
            .client
            .post(&request.url)
            .header("Content-Type", "application/json");

        if let Some(authorization) = &request.authorization {
            outgoing = outgoing.header("Authorization", authorization);
        }

        if let Some(session_id) = &request.session_id {
            outgoing = outgoing.header(SESSION_ID_HEADER, session_id);
        }

        let response = outgoing.body(request.body).send().await?;

        let status = response.status().as_u16();
        let session_id = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            session_id,
            body,
        })
    }
}

//! Session-aware RPC client.
//!
//! The daemon guards stateful calls with a CSRF-style session token: any
//! request carrying a missing or stale token is answered with `409` and a
//! fresh token in the response headers. The client learns the token lazily
//! from that signal, stores it, and retries the interrupted call exactly
//! once. A second `409` is surfaced to the caller instead of retried, so a
//! misbehaving server can never cause a retry loop.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::Error;
use crate::request::Request;
use crate::response::ResponseEnvelope;
use crate::transport::{HttpRequest, HttpTransport, Transport};

/// The serialized body of one RPC call.
#[derive(Serialize)]
struct Payload<'a> {
    method: &'a str,
    arguments: &'a Map<String, Value>,
}

/// A Transmission RPC client.
///
/// One client talks to one daemon. Calls are independent async operations
/// and may run concurrently; the session token is the only state shared
/// between them. The token is read fresh when a message is built and
/// written only after a `409` reply, never while a send is in flight.
pub struct Client<T = HttpTransport> {
    rpc_url: String,
    authorization: Option<String>,
    session_id: RwLock<Option<String>>,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client for the daemon at `base_url`.
    ///
    /// The RPC endpoint is `<base_url>/transmission/rpc`. If either
    /// credential is given, every request carries a Basic Authorization
    /// header built from `username:password` (missing halves are empty);
    /// with neither, the header is omitted entirely.
    #[must_use]
    pub fn new(base_url: &str, username: Option<&str>, password: Option<&str>) -> Self {
        Self::with_transport(base_url, username, password, HttpTransport::new())
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that sends through a custom transport.
    #[must_use]
    pub fn with_transport(
        base_url: &str,
        username: Option<&str>,
        password: Option<&str>,
        transport: T,
    ) -> Self {
        let authorization = (username.is_some() || password.is_some()).then(|| {
            let credentials = format!(
                "{}:{}",
                username.unwrap_or_default(),
                password.unwrap_or_default()
            );
            format!("Basic {}", BASE64.encode(credentials))
        });

        Self {
            rpc_url: format!("{}/transmission/rpc", base_url.trim_end_matches('/')),
            authorization,
            session_id: RwLock::new(None),
            transport,
        }
    }

    /// The session token currently held, if any.
    pub async fn session_id(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Sends a request and interprets the reply into the descriptor's
    /// typed value.
    ///
    /// A `409` on the first attempt refreshes the session token from the
    /// response and retries once; every other failure is terminal for this
    /// call.
    ///
    /// # Errors
    ///
    /// Every failure surface maps to one [`Error`] kind: serialization to
    /// [`Error::Encoding`], network failures to [`Error::Transport`],
    /// authentication rejection to [`Error::Unauthenticated`], a `409`
    /// without a token to [`Error::NoSessionId`], unrecognized or repeated
    /// statuses to [`Error::StatusCode`], malformed replies to
    /// [`Error::Decoding`] or [`Error::UnexpectedResponse`], and
    /// server-reported failures to [`Error::ServerError`].
    pub async fn send<V>(&self, request: &Request<V>) -> Result<V, Error> {
        let body = serde_json::to_string(&Payload {
            method: request.method(),
            arguments: request.args(),
        })
        .map_err(Error::Encoding)?;

        let mut retried = false;
        let envelope = loop {
            // Read the token fresh for every attempt; the lock is released
            // before the send so concurrent calls never serialize.
            let session_id = self.session_id.read().await.clone();
            let message = HttpRequest {
                url: self.rpc_url.clone(),
                authorization: self.authorization.clone(),
                session_id,
                body: body.clone(),
            };

            let response = self
                .transport
                .send(message)
                .await
                .map_err(Error::Transport)?;

            match response.status {
                _ if response.is_success() => {
                    break ResponseEnvelope::decode(&response.body)?;
                }
                401 => return Err(Error::Unauthenticated),
                409 if !retried => {
                    let Some(session_id) = response.session_id else {
                        return Err(Error::NoSessionId);
                    };
                    tracing::debug!(
                        "session id invalidated, retrying {} with a fresh token",
                        request.method()
                    );
                    *self.session_id.write().await = Some(session_id);
                    retried = true;
                }
                status => return Err(Error::StatusCode(status)),
            }
        };

        request.interpret(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::transport::HttpResponse;
    use serde_json::json;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Transport returning canned responses in order, recording every send.
    /// Panics if the pipeline sends more often than the script allows.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
            self.sent.lock().unwrap().push(request);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport received more sends than scripted");
            Ok(response)
        }
    }

    /// Transport that fails every send at the network layer.
    struct FailingTransport {
        sends: AtomicUsize,
    }

    impl Transport for FailingTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, BoxError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    /// Transport that answers the first attempt of every method with a
    /// distinct 409 + fresh token, and any attempt carrying a known method
    /// with success.
    struct RefreshingTransport {
        issued: Mutex<HashMap<String, String>>,
        counter: AtomicUsize,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl RefreshingTransport {
        fn new() -> Self {
            Self {
                issued: Mutex::new(HashMap::new()),
                counter: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for RefreshingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
            let body: Value = serde_json::from_str(&request.body).unwrap();
            let method = body["method"].as_str().unwrap().to_string();
            self.sent.lock().unwrap().push(request);

            let mut issued = self.issued.lock().unwrap();
            if issued.contains_key(&method) {
                Ok(success(r#"{"result":"success"}"#))
            } else {
                let token = format!("token-{}", self.counter.fetch_add(1, Ordering::SeqCst));
                issued.insert(method, token.clone());
                Ok(conflict(Some(&token)))
            }
        }
    }

    fn success(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            session_id: None,
            body: body.as_bytes().to_vec(),
        }
    }

    fn status(code: u16) -> HttpResponse {
        HttpResponse {
            status: code,
            session_id: None,
            body: Vec::new(),
        }
    }

    fn conflict(token: Option<&str>) -> HttpResponse {
        HttpResponse {
            status: 409,
            session_id: token.map(str::to_owned),
            body: Vec::new(),
        }
    }

    fn ping() -> Request<()> {
        Request::without_result("ping", Map::new())
    }

    fn client_with(
        responses: Vec<HttpResponse>,
    ) -> (Client<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let client = Client::with_transport(
            "http://localhost:9091",
            None,
            None,
            Arc::clone(&transport),
        );
        (client, transport)
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let (client, transport) = client_with(vec![success(r#"{"result":"success"}"#)]);

        client.send(&ping()).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:9091/transmission/rpc");
        assert!(sent[0].session_id.is_none());
        assert!(sent[0].authorization.is_none());

        let body: Value = serde_json::from_str(&sent[0].body).unwrap();
        assert_eq!(body, json!({"method": "ping", "arguments": {}}));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_normalized() {
        let transport = Arc::new(ScriptedTransport::new(vec![success(
            r#"{"result":"success"}"#,
        )]));
        let client = Client::with_transport(
            "http://localhost:9091/",
            None,
            None,
            Arc::clone(&transport),
        );

        client.send(&ping()).await.unwrap();
        assert_eq!(
            transport.sent()[0].url,
            "http://localhost:9091/transmission/rpc"
        );
    }

    #[tokio::test]
    async fn test_authorization_with_both_credentials() {
        let transport = Arc::new(ScriptedTransport::new(vec![success(
            r#"{"result":"success"}"#,
        )]));
        let client = Client::with_transport(
            "http://localhost:9091",
            Some("user"),
            Some("pass"),
            Arc::clone(&transport),
        );

        client.send(&ping()).await.unwrap();
        assert_eq!(
            transport.sent()[0].authorization.as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[tokio::test]
    async fn test_authorization_with_username_only() {
        let transport = Arc::new(ScriptedTransport::new(vec![success(
            r#"{"result":"success"}"#,
        )]));
        let client = Client::with_transport(
            "http://localhost:9091",
            Some("user"),
            None,
            Arc::clone(&transport),
        );

        client.send(&ping()).await.unwrap();
        assert_eq!(
            transport.sent()[0].authorization.as_deref(),
            Some("Basic dXNlcjo=")
        );
    }

    #[tokio::test]
    async fn test_authorization_with_password_only() {
        let transport = Arc::new(ScriptedTransport::new(vec![success(
            r#"{"result":"success"}"#,
        )]));
        let client = Client::with_transport(
            "http://localhost:9091",
            None,
            Some("pass"),
            Arc::clone(&transport),
        );

        client.send(&ping()).await.unwrap();
        assert_eq!(
            transport.sent()[0].authorization.as_deref(),
            Some("Basic OnBhc3M=")
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_short_circuits() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(401)]));
        let client = Client::with_transport(
            "http://localhost:9091",
            Some("user"),
            Some("wrong"),
            Arc::clone(&transport),
        );

        let result = client.send(&ping()).await;

        assert!(matches!(result, Err(Error::Unauthenticated)));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_refreshes_token_and_retries_once() {
        let (client, transport) = client_with(vec![
            conflict(Some("fresh-token")),
            success(r#"{"result":"success"}"#),
        ]);

        client.send(&ping()).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].session_id.is_none());
        assert_eq!(sent[1].session_id.as_deref(), Some("fresh-token"));
        assert_eq!(client.session_id().await.as_deref(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn test_second_conflict_is_not_retried() {
        let (client, transport) =
            client_with(vec![conflict(Some("token-1")), conflict(Some("token-2"))]);

        let result = client.send(&ping()).await;

        // The scripted transport would panic on a third send
        assert!(matches!(result, Err(Error::StatusCode(409))));
        assert_eq!(transport.sent().len(), 2);
        // The disarmed retry path no longer stores the second token
        assert_eq!(client.session_id().await.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn test_conflict_without_token_fails() {
        let (client, transport) = client_with(vec![conflict(None)]);

        let result = client.send(&ping()).await;

        assert!(matches!(result, Err(Error::NoSessionId)));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_without_token_on_retry_is_status_code() {
        let (client, transport) = client_with(vec![conflict(Some("token-1")), conflict(None)]);

        let result = client.send(&ping()).await;

        assert!(matches!(result, Err(Error::StatusCode(409))));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_without_retry() {
        let transport = Arc::new(FailingTransport {
            sends: AtomicUsize::new(0),
        });
        let client = Client::with_transport(
            "http://localhost:9091",
            None,
            None,
            Arc::clone(&transport),
        );

        let result = client.send(&ping()).await;

        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(transport.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_status_code() {
        let (client, transport) = client_with(vec![status(500)]);

        let result = client.send(&ping()).await;

        assert!(matches!(result, Err(Error::StatusCode(500))));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_fails_decoding() {
        let (client, _transport) = client_with(vec![success("not json")]);

        let result = client.send(&ping()).await;
        assert!(matches!(result, Err(Error::Decoding(_))));
    }

    #[tokio::test]
    async fn test_missing_result_field_is_unexpected_response() {
        let (client, _transport) = client_with(vec![success(r#"{"arguments":{}}"#)]);

        let result = client.send(&ping()).await;
        assert!(matches!(result, Err(Error::UnexpectedResponse)));
    }

    #[tokio::test]
    async fn test_server_reported_failure() {
        let (client, _transport) = client_with(vec![success(r#"{"result":"no such torrent"}"#)]);

        let result = client.send(&ping()).await;
        match result {
            Err(Error::ServerError(message)) => assert_eq!(message, "no such torrent"),
            other => panic!("expected ServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refreshed_token_is_reused_by_later_calls() {
        let (client, transport) = client_with(vec![
            conflict(Some("fresh-token")),
            success(r#"{"result":"success"}"#),
            success(r#"{"result":"success"}"#),
        ]);

        client.send(&ping()).await.unwrap();
        client.send(&ping()).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].session_id.as_deref(), Some("fresh-token"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_refreshes_keep_tokens_intact() {
        let transport = Arc::new(RefreshingTransport::new());
        let client = Arc::new(Client::with_transport(
            "http://localhost:9091",
            None,
            None,
            Arc::clone(&transport),
        ));

        let calls: usize = 8;
        let mut handles = Vec::new();
        for call in 0..calls {
            let client = Arc::clone(&client);
            let request = Request::without_result(format!("probe-{call}"), Map::new());
            handles.push(tokio::spawn(
                async move { client.send(&request).await },
            ));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let issued: Vec<String> = transport
            .issued
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        assert_eq!(issued.len(), calls);

        // Every send that carried a token carried a whole issued token,
        // never a torn or merged one
        let sent = transport.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), calls * 2);
        for request in &sent {
            if let Some(token) = &request.session_id {
                assert!(issued.contains(token), "unknown token {token}");
            }
        }

        // Whichever refresh won, the stored token is one of the issued set
        let stored = client.session_id().await.unwrap();
        assert!(issued.contains(&stored));
    }
}

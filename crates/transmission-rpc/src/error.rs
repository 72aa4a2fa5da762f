//! Error types for the transmission-rpc crate.
//!
//! Every failure surface of the pipeline maps to exactly one variant here;
//! nothing is swallowed or reported as an opaque error.

/// A boxed error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for RPC operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The outbound request body could not be serialized.
    #[error("request encoding error: {0}")]
    Encoding(serde_json::Error),

    /// The response body is not well-formed JSON.
    #[error("response decoding error: {0}")]
    Decoding(serde_json::Error),

    /// The underlying send/receive failed (DNS, connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(BoxError),

    /// The server answered with a status code outside the recognized set,
    /// or repeated a 409 after the session had already been refreshed.
    #[error("unexpected status code: {0}")]
    StatusCode(u16),

    /// The server demanded a new session but did not supply a session id.
    #[error("server did not supply a session id")]
    NoSessionId,

    /// The provided authentication was not valid.
    #[error("authentication failed")]
    Unauthenticated,

    /// The response parsed but was not a valid envelope, or its arguments
    /// did not match the expected shape.
    #[error("unexpected response")]
    UnexpectedResponse,

    /// The server reported a failure via a non-"success" result string.
    #[error("server error: {0}")]
    ServerError(String),

    /// Reading local data while building request arguments failed.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

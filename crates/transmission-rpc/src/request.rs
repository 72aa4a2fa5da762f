//! RPC request descriptors.
//!
//! A [`Request`] is a pure specification of one RPC call: the method name,
//! its argument map, and a transform that interprets the decoded reply.
//! Descriptors never fail to construct and have no side effects; the client
//! consumes them when sending.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::Error;
use crate::response::ResponseEnvelope;

type Transform<V> = Arc<dyn Fn(ResponseEnvelope) -> Result<V, Error> + Send + Sync>;

/// A definition of one Transmission RPC call and its typed outcome.
pub struct Request<V> {
    method: String,
    args: Map<String, Value>,
    transform: Transform<V>,
}

impl<V> Clone for Request<V> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            args: self.args.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<V> std::fmt::Debug for Request<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl<V: 'static> Request<V> {
    /// Creates a request from a method name, arguments, and a transform
    /// interpreting the reply envelope.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        args: Map<String, Value>,
        transform: impl Fn(ResponseEnvelope) -> Result<V, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            method: method.into(),
            args,
            transform: Arc::new(transform),
        }
    }

    /// Creates a new request by mapping this request's value into a new
    /// representation.
    ///
    /// The method and arguments are unchanged; only the interpretation of
    /// the reply composes.
    #[must_use]
    pub fn map<W: 'static>(self, f: impl Fn(V) -> W + Send + Sync + 'static) -> Request<W> {
        let transform = Arc::clone(&self.transform);
        Request {
            method: self.method,
            args: self.args,
            transform: Arc::new(move |envelope| transform(envelope).map(&f)),
        }
    }
}

impl Request<()> {
    /// Creates a request whose success carries no meaningful value; the
    /// reply body is ignored beyond envelope validation.
    #[must_use]
    pub fn without_result(method: impl Into<String>, args: Map<String, Value>) -> Self {
        Request::new(method, args, |_| Ok(()))
    }
}

impl<V> Request<V> {
    /// The RPC method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The arguments passed to the RPC method.
    #[must_use]
    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    /// Applies the transform to a decoded reply envelope.
    pub(crate) fn interpret(&self, envelope: ResponseEnvelope) -> Result<V, Error> {
        (self.transform)(envelope)
    }
}

//! Response envelope decoding.
//!
//! Every reply from the daemon is a JSON object with a `result` string and
//! an optional `arguments` object. The decoder validates that shape and
//! separates protocol-level failures (a non-"success" result) from replies
//! that are not envelopes at all.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// The decoded top-level reply object for one RPC call.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    result: String,
    arguments: Option<Value>,
}

impl ResponseEnvelope {
    /// Decodes a raw reply body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] if the body is not well-formed JSON,
    /// [`Error::UnexpectedResponse`] if it is not an object or lacks a
    /// string `result` field, and [`Error::ServerError`] carrying the
    /// literal result string if the server reported anything other than
    /// `"success"`.
    pub fn decode(body: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(body).map_err(Error::Decoding)?;

        let Value::Object(mut object) = value else {
            return Err(Error::UnexpectedResponse);
        };

        let result = match object.remove("result") {
            Some(Value::String(result)) => result,
            _ => return Err(Error::UnexpectedResponse),
        };

        if result != "success" {
            return Err(Error::ServerError(result));
        }

        Ok(Self {
            result,
            arguments: object.remove("arguments"),
        })
    }

    /// The protocol-level outcome tag; always `"success"` for a decoded
    /// envelope.
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The raw `arguments` object, if the reply carried one.
    #[must_use]
    pub fn raw_arguments(&self) -> Option<&Value> {
        self.arguments.as_ref()
    }

    /// Decodes the `arguments` object into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the arguments are absent or
    /// do not match the expected shape; a type mismatch never silently
    /// yields an absent value.
    pub fn arguments<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = self.arguments.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|_| Error::UnexpectedResponse)
    }
}

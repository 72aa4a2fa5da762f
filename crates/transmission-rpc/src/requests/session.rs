//! Session-level requests.

use serde::Deserialize;
use serde_json::{Map, json};

use crate::request::Request;

/// Requests the RPC API version of the server.
///
/// RPC method: `session-get`.
#[must_use]
pub fn rpc_version() -> Request<u64> {
    #[derive(Deserialize)]
    struct Args {
        #[serde(rename = "rpc-version")]
        rpc_version: u64,
    }

    let mut args = Map::new();
    args.insert("fields".to_string(), json!(["rpc-version"]));

    Request::new("session-get", args, |envelope| {
        envelope.arguments::<Args>().map(|args| args.rpc_version)
    })
}

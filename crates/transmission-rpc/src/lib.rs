//! Session-aware client for the Transmission RPC protocol.
//!
//! Transmission's control API is JSON-RPC over HTTP guarded by a
//! CSRF-style session token the daemon can invalidate at any time. This
//! crate implements the request pipeline around that protocol:
//!
//! - [`request`]: descriptors pairing an RPC method with a typed reply
//!   transform
//! - [`client`]: the session-aware sender with the one-shot token-refresh
//!   retry
//! - [`response`]: reply envelope decoding
//! - [`transport`]: the HTTP capability trait and its reqwest
//!   implementation
//! - [`requests`]: ready-made descriptors for the daemon's methods
//! - [`error`]: the closed error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use transmission_rpc::{Client, PropertyKey, requests};
//!
//! # async fn example() -> transmission_rpc::Result<()> {
//! let client = Client::new("http://localhost:9091", None, None);
//!
//! let torrents = client
//!     .send(&requests::torrent::torrents(&PropertyKey::ALL))
//!     .await?;
//! for torrent in torrents {
//!     println!("{:?} {:?}", torrent.name, torrent.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod requests;
pub mod response;
pub mod transport;

// Re-export the pipeline types
pub use client::Client;
pub use error::{BoxError, Error, Result};
pub use request::Request;
pub use response::ResponseEnvelope;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, SESSION_ID_HEADER, Transport};

// Re-export the wire models from transmission-types
pub use transmission_types::{
    Priority, PropertyKey, Torrent, TorrentFile, TorrentId, TorrentStatus, Tracker,
};

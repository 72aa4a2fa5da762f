//! Descriptor constructors for the daemon's RPC methods.
//!
//! These are pure data: each function builds a [`Request`](crate::Request)
//! with the method name, argument keys, and reply transform the daemon
//! expects, organized by category:
//! - [`torrent`]: actions, listing, files, add/remove, location, options
//! - [`session`]: server-level queries

pub mod session;
pub mod torrent;

pub use torrent::TorrentOption;

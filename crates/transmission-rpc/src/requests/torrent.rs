//! Torrent action, listing, and mutation requests.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use transmission_types::{Priority, PropertyKey, Torrent, TorrentFile, TorrentId};

use crate::error::Error;
use crate::request::Request;

fn action(method: &'static str, ids: &[TorrentId]) -> Request<()> {
    let mut args = Map::new();
    args.insert("ids".to_string(), json!(ids));
    Request::without_result(method, args)
}

/// Starts torrents with the given ids and/or hashes.
///
/// RPC method: `torrent-start`.
#[must_use]
pub fn start(ids: &[TorrentId]) -> Request<()> {
    action("torrent-start", ids)
}

/// Stops torrents with the given ids and/or hashes.
///
/// RPC method: `torrent-stop`.
#[must_use]
pub fn stop(ids: &[TorrentId]) -> Request<()> {
    action("torrent-stop", ids)
}

/// Verifies the data of torrents with the given ids and/or hashes.
///
/// RPC method: `torrent-verify`.
#[must_use]
pub fn verify(ids: &[TorrentId]) -> Request<()> {
    action("torrent-verify", ids)
}

/// Forces a tracker reannounce for torrents with the given ids and/or
/// hashes.
///
/// RPC method: `torrent-reannounce`.
#[must_use]
pub fn reannounce(ids: &[TorrentId]) -> Request<()> {
    action("torrent-reannounce", ids)
}

/// Requests the list of torrents with the given properties.
///
/// RPC method: `torrent-get`.
#[must_use]
pub fn torrents(properties: &[PropertyKey]) -> Request<Vec<Torrent>> {
    #[derive(Deserialize)]
    struct Args {
        torrents: Vec<Torrent>,
    }

    let mut args = Map::new();
    args.insert("fields".to_string(), json!(properties));

    Request::new("torrent-get", args, |envelope| {
        envelope.arguments::<Args>().map(|args| args.torrents)
    })
}

/// Requests the file list of one torrent.
///
/// RPC method: `torrent-get` with the `files` and `fileStats` fields; the
/// reply's two parallel arrays are zipped into one entry per file.
#[must_use]
pub fn files(id: impl Into<TorrentId>) -> Request<Vec<TorrentFile>> {
    #[derive(Deserialize)]
    struct Args {
        torrents: Vec<Entry>,
    }

    #[derive(Deserialize)]
    struct Entry {
        files: Vec<FileInfo>,
        #[serde(rename = "fileStats")]
        file_stats: Vec<FileStats>,
    }

    #[derive(Deserialize)]
    struct FileInfo {
        name: String,
        length: i64,
        #[serde(rename = "bytesCompleted")]
        bytes_completed: i64,
    }

    #[derive(Deserialize)]
    struct FileStats {
        priority: Priority,
        wanted: bool,
    }

    let mut args = Map::new();
    args.insert("ids".to_string(), json!([id.into()]));
    args.insert("fields".to_string(), json!(["files", "fileStats"]));

    Request::new("torrent-get", args, |envelope| {
        let mut decoded: Args = envelope.arguments()?;
        if decoded.torrents.is_empty() {
            return Err(Error::UnexpectedResponse);
        }

        let entry = decoded.torrents.swap_remove(0);
        Ok(entry
            .files
            .into_iter()
            .zip(entry.file_stats)
            .enumerate()
            .map(|(index, (file, stats))| TorrentFile {
                index,
                name: file.name,
                size: file.length,
                downloaded: file.bytes_completed,
                priority: stats.priority,
                wanted: stats.wanted,
            })
            .collect())
    })
}

/// Adds a torrent from a web URL to a torrent file or a magnet URL.
///
/// RPC method: `torrent-add`.
#[must_use]
pub fn add(url: &str) -> Request<()> {
    let mut args = Map::new();
    args.insert("filename".to_string(), json!(url));
    Request::without_result("torrent-add", args)
}

/// Adds a torrent from a local `.torrent` file.
///
/// The file is read eagerly and embedded base64-encoded as the request's
/// `metainfo` argument.
///
/// RPC method: `torrent-add`.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] if the file cannot be read.
pub fn add_file(path: &Path) -> Result<Request<()>, Error> {
    let contents = std::fs::read(path)?;
    let mut args = Map::new();
    args.insert("metainfo".to_string(), json!(BASE64.encode(contents)));
    Ok(Request::without_result("torrent-add", args))
}

/// Removes torrents with the given ids and/or hashes, optionally deleting
/// their downloaded data.
///
/// RPC method: `torrent-remove`.
#[must_use]
pub fn remove(ids: &[TorrentId], remove_data: bool) -> Request<()> {
    let mut args = Map::new();
    args.insert("ids".to_string(), json!(ids));
    args.insert("delete-local-data".to_string(), json!(remove_data));
    Request::without_result("torrent-remove", args)
}

/// Moves the storage for torrents to a new location.
///
/// RPC method: `torrent-set-location`.
#[must_use]
pub fn move_storage(ids: &[TorrentId], path: &str) -> Request<()> {
    let mut args = Map::new();
    args.insert("ids".to_string(), json!(ids));
    args.insert("location".to_string(), json!(path));
    args.insert("move".to_string(), json!(true));
    Request::without_result("torrent-set-location", args)
}

/// Applies options to torrents with the given ids and/or hashes.
///
/// RPC method: `torrent-set`.
#[must_use]
pub fn set(ids: &[TorrentId], options: Vec<TorrentOption>) -> Request<()> {
    let mut args = Map::new();
    args.insert("ids".to_string(), json!(ids));
    for option in options {
        args.insert(option.key, option.value);
    }
    Request::without_result("torrent-set", args)
}

/// An option that can be set on a torrent via [`set`].
#[derive(Debug, Clone)]
pub struct TorrentOption {
    key: String,
    value: Value,
}

impl TorrentOption {
    /// An arbitrary option; refer to the RPC spec for valid keys.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Marks the files with the given indices as wanted.
    ///
    /// Key: `files-wanted`.
    #[must_use]
    pub fn files_wanted(indices: &[usize]) -> Self {
        Self::new("files-wanted", json!(indices))
    }

    /// Marks the files with the given indices as unwanted.
    ///
    /// Key: `files-unwanted`.
    #[must_use]
    pub fn files_unwanted(indices: &[usize]) -> Self {
        Self::new("files-unwanted", json!(indices))
    }

    /// Sets the priority to low for the files with the given indices.
    ///
    /// Key: `priority-low`.
    #[must_use]
    pub fn priority_low(indices: &[usize]) -> Self {
        Self::new("priority-low", json!(indices))
    }

    /// Sets the priority to normal for the files with the given indices.
    ///
    /// Key: `priority-normal`.
    #[must_use]
    pub fn priority_normal(indices: &[usize]) -> Self {
        Self::new("priority-normal", json!(indices))
    }

    /// Sets the priority to high for the files with the given indices.
    ///
    /// Key: `priority-high`.
    #[must_use]
    pub fn priority_high(indices: &[usize]) -> Self {
        Self::new("priority-high", json!(indices))
    }
}

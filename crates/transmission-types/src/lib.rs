//! Wire types for the Transmission RPC API.
//!
//! This crate provides the data models shared by transmission-rpc and its
//! consumers: torrents, trackers, files, priorities, and the property keys
//! used to request torrent fields. All types serialize to the exact field
//! names the daemon speaks.

use serde::{Deserialize, Serialize};

/// Identifies a torrent by its daemon-assigned id or its SHA1 hash.
///
/// Every request that addresses torrents accepts either form, so this
/// serializes untagged: ids as JSON numbers, hashes as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TorrentId {
    Id(i64),
    Hash(String),
}

impl std::fmt::Display for TorrentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TorrentId::Id(id) => write!(f, "{id}"),
            TorrentId::Hash(hash) => write!(f, "{hash}"),
        }
    }
}

impl From<i64> for TorrentId {
    fn from(id: i64) -> Self {
        TorrentId::Id(id)
    }
}

impl From<String> for TorrentId {
    fn from(hash: String) -> Self {
        TorrentId::Hash(hash)
    }
}

impl From<&str> for TorrentId {
    fn from(hash: &str) -> Self {
        TorrentId::Hash(hash.to_string())
    }
}

/// The status of a torrent as reported by `torrent-get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TorrentStatus {
    /// The torrent is paused.
    Paused,
    /// The torrent is queued to be verified.
    CheckQueued,
    /// The torrent data is being verified.
    Checking,
    /// The torrent is queued to be downloaded.
    DownloadQueued,
    /// The torrent is downloading.
    Downloading,
    /// The torrent is queued to be seeded.
    SeedQueued,
    /// The torrent is seeding.
    Seeding,
    /// The torrent cannot find peers (no usable trackers).
    Isolated,
}

impl TryFrom<i64> for TorrentStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TorrentStatus::Paused),
            1 => Ok(TorrentStatus::CheckQueued),
            2 => Ok(TorrentStatus::Checking),
            3 => Ok(TorrentStatus::DownloadQueued),
            4 => Ok(TorrentStatus::Downloading),
            5 => Ok(TorrentStatus::SeedQueued),
            6 => Ok(TorrentStatus::Seeding),
            7 => Ok(TorrentStatus::Isolated),
            other => Err(format!("unknown torrent status: {other}")),
        }
    }
}

impl From<TorrentStatus> for i64 {
    fn from(status: TorrentStatus) -> Self {
        match status {
            TorrentStatus::Paused => 0,
            TorrentStatus::CheckQueued => 1,
            TorrentStatus::Checking => 2,
            TorrentStatus::DownloadQueued => 3,
            TorrentStatus::Downloading => 4,
            TorrentStatus::SeedQueued => 5,
            TorrentStatus::Seeding => 6,
            TorrentStatus::Isolated => 7,
        }
    }
}

/// A download priority value.
///
/// The daemon uses -1/0/1 today but the field is deliberately open: unknown
/// values round-trip unchanged instead of failing decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i64);

impl Priority {
    /// The low priority value (-1).
    pub const LOW: Priority = Priority(-1);
    /// The normal priority value (0).
    pub const NORMAL: Priority = Priority(0);
    /// The high priority value (1).
    pub const HIGH: Priority = Priority(1);
}

/// A tracker entry from a torrent's `trackerStats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    /// The tracker's id.
    pub id: i64,
    /// The tracker host URL.
    pub host: String,
}

/// A single file inside a torrent, assembled from the `files` and
/// `fileStats` arrays of a `torrent-get` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// The index of the file within the torrent.
    pub index: usize,
    /// The file path relative to the download directory.
    pub name: String,
    /// The size of the file in bytes.
    pub size: i64,
    /// The number of bytes downloaded so far.
    pub downloaded: i64,
    /// The download priority of the file.
    pub priority: Priority,
    /// Whether the file is marked as wanted.
    pub wanted: bool,
}

/// A torrent as returned by `torrent-get`.
///
/// Every field is optional: the daemon only returns the fields named in the
/// request's `fields` argument. Field names follow the RPC spec, so most
/// carry a rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Torrent {
    /// The number of bytes of partial pieces.
    #[serde(rename = "haveUnchecked", skip_serializing_if = "Option::is_none")]
    pub bytes_unchecked: Option<i64>,
    /// The number of bytes of checksum-verified data.
    #[serde(rename = "haveValid", skip_serializing_if = "Option::is_none")]
    pub bytes_valid: Option<i64>,
    /// When the torrent was added, as unix seconds.
    #[serde(rename = "addedDate", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    /// The directory the torrent data is downloaded to.
    #[serde(rename = "downloadDir", skip_serializing_if = "Option::is_none")]
    pub download_path: Option<String>,
    /// The download rate in bytes/s.
    #[serde(rename = "rateDownload", skip_serializing_if = "Option::is_none")]
    pub download_rate: Option<i64>,
    /// The estimated seconds until the download completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    /// The SHA1 hash of the torrent.
    #[serde(rename = "hashString", skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// The daemon-assigned torrent id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The name of the torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The number of peers downloading from us.
    #[serde(
        rename = "peersGettingFromUs",
        skip_serializing_if = "Option::is_none"
    )]
    pub peers: Option<i64>,
    /// Download progress between 0 and 1.
    #[serde(rename = "percentDone", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// The number of peers sending to us.
    #[serde(rename = "peersSendingToUs", skip_serializing_if = "Option::is_none")]
    pub seeds: Option<i64>,
    /// The total size of the torrent contents in bytes.
    #[serde(rename = "totalSize", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// The status of the torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TorrentStatus>,
    /// The number of connected peers.
    #[serde(rename = "peersConnected", skip_serializing_if = "Option::is_none")]
    pub total_peers: Option<i64>,
    /// The trackers used by the torrent.
    #[serde(rename = "trackerStats", skip_serializing_if = "Option::is_none")]
    pub trackers: Option<Vec<Tracker>>,
    /// The number of bytes uploaded over the torrent's lifetime.
    #[serde(rename = "uploadedEver", skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<i64>,
    /// The upload rate in bytes/s.
    #[serde(rename = "rateUpload", skip_serializing_if = "Option::is_none")]
    pub upload_rate: Option<i64>,
}

/// The keys accepted by `torrent-get`'s `fields` argument.
///
/// Each variant serializes to the wire name the daemon expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    #[serde(rename = "haveUnchecked")]
    BytesUnchecked,
    #[serde(rename = "haveValid")]
    BytesValid,
    #[serde(rename = "addedDate")]
    DateAdded,
    #[serde(rename = "downloadDir")]
    DownloadPath,
    #[serde(rename = "rateDownload")]
    DownloadRate,
    #[serde(rename = "eta")]
    Eta,
    #[serde(rename = "hashString")]
    Hash,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "peersGettingFromUs")]
    Peers,
    #[serde(rename = "percentDone")]
    Progress,
    #[serde(rename = "peersSendingToUs")]
    Seeds,
    #[serde(rename = "totalSize")]
    Size,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "peersConnected")]
    TotalPeers,
    #[serde(rename = "trackerStats")]
    Trackers,
    #[serde(rename = "uploadedEver")]
    Uploaded,
    #[serde(rename = "rateUpload")]
    UploadRate,
}

impl PropertyKey {
    /// All property keys, for requesting every supported torrent field.
    pub const ALL: [PropertyKey; 18] = [
        PropertyKey::BytesUnchecked,
        PropertyKey::BytesValid,
        PropertyKey::DateAdded,
        PropertyKey::DownloadPath,
        PropertyKey::DownloadRate,
        PropertyKey::Eta,
        PropertyKey::Hash,
        PropertyKey::Id,
        PropertyKey::Name,
        PropertyKey::Peers,
        PropertyKey::Progress,
        PropertyKey::Seeds,
        PropertyKey::Size,
        PropertyKey::Status,
        PropertyKey::TotalPeers,
        PropertyKey::Trackers,
        PropertyKey::Uploaded,
        PropertyKey::UploadRate,
    ];

    /// The wire name sent to the daemon for this key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKey::BytesUnchecked => "haveUnchecked",
            PropertyKey::BytesValid => "haveValid",
            PropertyKey::DateAdded => "addedDate",
            PropertyKey::DownloadPath => "downloadDir",
            PropertyKey::DownloadRate => "rateDownload",
            PropertyKey::Eta => "eta",
            PropertyKey::Hash => "hashString",
            PropertyKey::Id => "id",
            PropertyKey::Name => "name",
            PropertyKey::Peers => "peersGettingFromUs",
            PropertyKey::Progress => "percentDone",
            PropertyKey::Seeds => "peersSendingToUs",
            PropertyKey::Size => "totalSize",
            PropertyKey::Status => "status",
            PropertyKey::TotalPeers => "peersConnected",
            PropertyKey::Trackers => "trackerStats",
            PropertyKey::Uploaded => "uploadedEver",
            PropertyKey::UploadRate => "rateUpload",
        }
    }
}

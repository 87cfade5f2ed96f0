// Plex Media Server response types
//
// The server answers JSON when asked with `Accept: application/json`. Every
// payload is wrapped in a `MediaContainer` object whose child arrays are
// named after the XML elements they replace (`Directory`, `Metadata`,
// `Server`). Fields use `#[serde(default)]` liberally because the server
// omits anything it has no value for.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Plex response envelope.
///
/// ```json
/// { "MediaContainer": { "size": 1, "Metadata": [...] } }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// Container of library sections (`/library/sections`).
#[derive(Debug, Default, Deserialize)]
pub struct SectionContainer {
    #[serde(default, rename = "Directory")]
    pub directories: Vec<LibrarySection>,
}

/// Container of metadata items (section listings, children, leaves).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataContainer {
    #[serde(default, rename = "Metadata")]
    pub metadata: Vec<Metadata>,
}

/// Container of registered players (`/clients`).
#[derive(Debug, Default, Deserialize)]
pub struct ClientContainer {
    #[serde(default, rename = "Server")]
    pub servers: Vec<PlayerClient>,
}

// ── Library ──────────────────────────────────────────────────────────

/// Kind of a library section or metadata item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
    Season,
    Episode,
    Artist,
    Photo,
    #[serde(other)]
    Other,
}

/// A library section such as "Movies" or "TV Shows".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// A library item: movie, show, season or episode.
///
/// Only the fields the dispatcher and the registration flow need are
/// modelled; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub rating_key: String,
    /// Playable key, e.g. `/library/metadata/42`. For shows this points
    /// at the children listing instead.
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub year: Option<u32>,
    /// Episode count (shows only).
    #[serde(default)]
    pub leaf_count: Option<u32>,
    /// Season number (episodes only).
    #[serde(default)]
    pub parent_index: Option<u32>,
    /// Episode number within the season (episodes only).
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub library_section_title: Option<String>,
    #[serde(default, rename = "OnDeck")]
    pub on_deck: Option<MetadataContainer>,
}

impl Metadata {
    /// `/library/metadata/{ratingKey}`, valid for every item kind.
    pub fn metadata_path(&self) -> String {
        format!("/library/metadata/{}", self.rating_key)
    }

    /// `S02E05`-style label for episodes, `None` for anything else.
    pub fn season_episode(&self) -> Option<String> {
        match (self.parent_index, self.index) {
            (Some(season), Some(episode)) => Some(format!("S{season:02}E{episode:02}")),
            _ => None,
        }
    }
}

// ── Play queues ──────────────────────────────────────────────────────

/// A server-side play queue (`POST /playQueues`).
#[derive(Debug, Clone, Deserialize)]
pub struct PlayQueue {
    #[serde(rename = "playQueueID")]
    pub id: u64,
    #[serde(default, rename = "Metadata")]
    pub items: Vec<Metadata>,
}

// ── Players ──────────────────────────────────────────────────────────

/// A player registered with the server that accepts remote-control commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerClient {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    pub address: String,
    pub port: u16,
    pub machine_identifier: String,
    #[serde(default)]
    pub product: Option<String>,
    /// Comma-separated list, e.g. `timeline,playback,navigation`.
    #[serde(default)]
    pub protocol_capabilities: String,
}

impl PlayerClient {
    /// Whether the player advertises the `playback` remote-control capability.
    pub fn can_play(&self) -> bool {
        self.protocol_capabilities
            .split(',')
            .any(|cap| cap.trim() == "playback")
    }
}

// ── Domain model ──
//
// Card identifiers, what a card is mapped to, and the catalog items the
// dispatcher works with. Everything here is immutable once built.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

// ── CardId ───────────────────────────────────────────────────────────

/// Hex identifier read from an NFC card, e.g. `04a1b2c3`.
///
/// Compared byte-for-byte: `04A1B2` and `04a1b2` are different cards as
/// far as the card map is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card id {0:?}: expected hexadecimal digits")]
pub struct InvalidCardId(pub String);

impl CardId {
    /// Parse a reader line, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, InvalidCardId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidCardId(raw.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CardId {
    type Err = InvalidCardId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CardId {
    type Error = InvalidCardId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> Self {
        id.0
    }
}

// ── PlaybackTarget ───────────────────────────────────────────────────

/// What kind of content a card plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Movie,
    #[serde(rename = "show", alias = "series")]
    #[strum(to_string = "show", serialize = "series")]
    Series,
}

impl ContentKind {
    /// Library section searched when a card does not name one.
    pub fn default_section(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Series => "TV Shows",
        }
    }
}

/// How a series card picks its episode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShowMode {
    /// Next unwatched episode, else the very first one.
    #[default]
    Next,
    /// A freshly shuffled queue of the whole series.
    Shuffle,
}

/// What a card is mapped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackTarget {
    pub content_kind: ContentKind,
    pub title: String,
    pub library_section: String,
    /// Only meaningful for [`ContentKind::Series`].
    pub mode: ShowMode,
}

impl PlaybackTarget {
    pub fn movie(title: impl Into<String>) -> Self {
        Self {
            content_kind: ContentKind::Movie,
            title: title.into(),
            library_section: ContentKind::Movie.default_section().into(),
            mode: ShowMode::Next,
        }
    }

    pub fn series(title: impl Into<String>, mode: ShowMode) -> Self {
        Self {
            content_kind: ContentKind::Series,
            title: title.into(),
            library_section: ContentKind::Series.default_section().into(),
            mode,
        }
    }

    /// Look the title up in `section` instead of the kind's default.
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.library_section = section.into();
        self
    }
}

/// Card identifier → playback target, loaded once at startup.
pub type CardMap = HashMap<CardId, PlaybackTarget>;

// ── Catalog items ────────────────────────────────────────────────────

/// Kind of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Show,
    Episode,
    Other,
}

/// A catalog entry as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Stable catalog id (Plex `ratingKey`).
    pub id: String,
    /// Key a player needs to start this item.
    pub play_key: String,
    pub title: String,
    pub kind: ItemKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub year: Option<u32>,
    /// Number of episodes (shows only).
    pub episode_count: Option<u32>,
    /// Title of the library section the item lives in.
    pub section: Option<String>,
}

impl MediaItem {
    /// Canonical ordering key for episodes; items without numbers sort last.
    pub fn episode_order(&self) -> (u32, u32) {
        (
            self.season.unwrap_or(u32::MAX),
            self.episode.unwrap_or(u32::MAX),
        )
    }

    /// Label used in logs: `S02E05 - Title` for episodes, the title otherwise.
    pub fn label(&self) -> String {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => format!("S{s:02}E{e:02} - {}", self.title),
            _ => self.title.clone(),
        }
    }
}

/// A server-side queue of items, first item plays first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayQueue {
    pub id: String,
    pub items: Vec<MediaItem>,
}

/// The item (and optional queue) finally sent to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableMedia {
    pub play_key: String,
    /// Present only for shuffled series playback.
    pub queue_id: Option<String>,
    pub display_name: String,
}

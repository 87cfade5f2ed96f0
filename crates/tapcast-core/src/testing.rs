// In-memory catalog and device used by the unit tests.

#![allow(clippy::unwrap_used)]

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::device::PlaybackDevice;
use crate::error::DispatchError;
use crate::model::{ItemKind, MediaItem, PlayQueue, PlayableMedia};

pub(crate) fn item(id: &str, title: &str, kind: ItemKind) -> MediaItem {
    MediaItem {
        id: id.into(),
        play_key: format!("/library/metadata/{id}"),
        title: title.into(),
        kind,
        season: None,
        episode: None,
        year: None,
        episode_count: None,
        section: None,
    }
}

pub(crate) fn episode(id: &str, season: u32, number: u32) -> MediaItem {
    MediaItem {
        season: Some(season),
        episode: Some(number),
        ..item(id, &format!("Episode {number}"), ItemKind::Episode)
    }
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct FakePlayer(pub &'static str);

impl fmt::Display for FakePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    /// (section, item) pairs `resolve` can find.
    pub items: Vec<(&'static str, MediaItem)>,
    pub on_deck: Option<MediaItem>,
    pub episodes: Vec<MediaItem>,
    pub queue: Option<PlayQueue>,
    pub player: Option<FakePlayer>,
    pub player_rejects: bool,
    pub lookups: AtomicU32,
    pub played: Mutex<Vec<PlayableMedia>>,
}

impl FakeCatalog {
    pub(crate) fn with_item(section: &'static str, item: MediaItem) -> Self {
        Self {
            items: vec![(section, item)],
            ..Self::default()
        }
    }

    pub(crate) fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn played(&self) -> Vec<PlayableMedia> {
        self.played.lock().unwrap().clone()
    }

    fn count(&self) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
    }
}

impl Catalog for FakeCatalog {
    type Player = FakePlayer;

    async fn resolve(&self, section: &str, title: &str) -> Result<MediaItem, DispatchError> {
        self.count();
        self.items
            .iter()
            .find(|(s, i)| *s == section && i.title.eq_ignore_ascii_case(title))
            .map(|(_, i)| i.clone())
            .ok_or_else(|| DispatchError::resolution(title, "not in fake catalog"))
    }

    async fn next_unwatched(&self, _show: &MediaItem) -> Result<Option<MediaItem>, DispatchError> {
        self.count();
        Ok(self.on_deck.clone())
    }

    async fn episodes(&self, _show: &MediaItem) -> Result<Vec<MediaItem>, DispatchError> {
        self.count();
        Ok(self.episodes.clone())
    }

    async fn shuffled_queue(&self, _show: &MediaItem) -> Result<PlayQueue, DispatchError> {
        self.count();
        self.queue
            .clone()
            .ok_or_else(|| DispatchError::resolution("queue", "no queue configured"))
    }

    async fn controllable_player(&self) -> Result<Option<FakePlayer>, DispatchError> {
        self.count();
        Ok(self.player.clone())
    }

    async fn play_on_player(
        &self,
        _player: &FakePlayer,
        media: &PlayableMedia,
    ) -> Result<(), DispatchError> {
        if self.player_rejects {
            return Err(DispatchError::Command {
                message: "player said no".into(),
                status: Some(500),
            });
        }
        self.played.lock().unwrap().push(media.clone());
        Ok(())
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Device whose command port opens on the `opens_on`-th probe (never if 0).
#[derive(Default)]
pub(crate) struct FakeDevice {
    pub dormant: bool,
    pub opens_on: u32,
    pub probes: AtomicU32,
    pub calls: Mutex<Vec<&'static str>>,
    pub sent: Mutex<Vec<PlayableMedia>>,
}

impl FakeDevice {
    /// Awake device whose port is already open.
    pub(crate) fn ready() -> Self {
        Self {
            opens_on: 1,
            ..Self::default()
        }
    }

    pub(crate) fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent(&self) -> Vec<PlayableMedia> {
        self.sent.lock().unwrap().clone()
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlaybackDevice for FakeDevice {
    async fn is_dormant(&self) -> Result<bool, DispatchError> {
        self.log("query");
        Ok(self.dormant)
    }

    async fn wake(&self) -> Result<(), DispatchError> {
        self.log("wake");
        Ok(())
    }

    async fn launch_player_app(&self) -> Result<(), DispatchError> {
        self.log("launch");
        Ok(())
    }

    fn command_port(&self) -> u16 {
        8324
    }

    async fn probe_command_channel(&self, _timeout: Duration) -> bool {
        let n = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        self.opens_on != 0 && n >= self.opens_on
    }

    async fn send_play(&self, media: &PlayableMedia) -> Result<(), DispatchError> {
        self.log("play");
        self.sent.lock().unwrap().push(media.clone());
        Ok(())
    }
}

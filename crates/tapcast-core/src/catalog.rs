// ── Catalog ──
//
// The media catalog the dispatcher resolves card targets against, plus the
// registry of players it can command directly. `PlexCatalog` is the only
// production implementation; tests use in-memory fakes.

use std::fmt;
use std::future::Future;

use tapcast_api::{MediaKind, Metadata, PlayMediaRequest, PlayerClient, PlexClient};
use tracing::debug;

use crate::error::DispatchError;
use crate::model::{ItemKind, MediaItem, PlayQueue, PlayableMedia};

/// Lookups and direct-player commands the dispatcher needs.
pub trait Catalog: Send + Sync {
    /// A directly controllable player.
    type Player: fmt::Display + Send + Sync;

    /// Find `title` (exact, case-insensitive) in the section named `section`.
    fn resolve(
        &self,
        section: &str,
        title: &str,
    ) -> impl Future<Output = Result<MediaItem, DispatchError>> + Send;

    /// The server's "continue watching" episode for a show, if any.
    fn next_unwatched(
        &self,
        show: &MediaItem,
    ) -> impl Future<Output = Result<Option<MediaItem>, DispatchError>> + Send;

    /// Every episode of a show, in whatever order the catalog returns them.
    fn episodes(
        &self,
        show: &MediaItem,
    ) -> impl Future<Output = Result<Vec<MediaItem>, DispatchError>> + Send;

    /// A freshly created, shuffled queue covering the whole show.
    fn shuffled_queue(
        &self,
        show: &MediaItem,
    ) -> impl Future<Output = Result<PlayQueue, DispatchError>> + Send;

    /// First registered player able to take playback commands.
    fn controllable_player(
        &self,
    ) -> impl Future<Output = Result<Option<Self::Player>, DispatchError>> + Send;

    /// Send `media` straight to `player`.
    fn play_on_player(
        &self,
        player: &Self::Player,
        media: &PlayableMedia,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

// ── Plex ─────────────────────────────────────────────────────────────

/// [`Catalog`] backed by a Plex Media Server.
pub struct PlexCatalog {
    client: PlexClient,
}

/// A player listed under the server's `/clients`.
#[derive(Debug, Clone)]
pub struct RegisteredPlayer(pub PlayerClient);

impl fmt::Display for RegisteredPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.0.name, self.0.address, self.0.port)
    }
}

impl PlexCatalog {
    pub fn new(client: PlexClient) -> Self {
        Self { client }
    }

    /// Search the movie and show sections for titles containing `query`,
    /// keeping at most `per_section` hits from each.
    ///
    /// Results keep section order, then server order within a section.
    pub async fn search(
        &self,
        query: &str,
        per_section: usize,
    ) -> Result<Vec<MediaItem>, DispatchError> {
        let sections = self.client.sections().await?;
        let mut found = Vec::new();
        for section in sections
            .iter()
            .filter(|s| matches!(s.kind, MediaKind::Movie | MediaKind::Show))
        {
            let items = self.client.section_items(&section.key, query).await?;
            debug!(section = %section.title, hits = items.len(), "search");
            found.extend(items.into_iter().take(per_section).map(|m| {
                let mut item = MediaItem::from(m);
                item.section.get_or_insert_with(|| section.title.clone());
                item
            }));
        }
        Ok(found)
    }
}

impl From<Metadata> for MediaItem {
    fn from(m: Metadata) -> Self {
        let kind = match m.kind {
            MediaKind::Movie => ItemKind::Movie,
            MediaKind::Show => ItemKind::Show,
            MediaKind::Episode => ItemKind::Episode,
            _ => ItemKind::Other,
        };
        Self {
            play_key: m.metadata_path(),
            id: m.rating_key,
            title: m.title,
            kind,
            season: m.parent_index,
            episode: m.index,
            year: m.year,
            episode_count: m.leaf_count,
            section: m.library_section_title,
        }
    }
}

impl Catalog for PlexCatalog {
    type Player = RegisteredPlayer;

    async fn resolve(&self, section: &str, title: &str) -> Result<MediaItem, DispatchError> {
        let sections = self.client.sections().await?;
        let Some(found) = sections
            .iter()
            .find(|s| s.title.eq_ignore_ascii_case(section))
        else {
            return Err(DispatchError::resolution(
                format!("section {section:?}"),
                "no library section with that name",
            ));
        };

        let items = self.client.section_items(&found.key, title).await?;
        items
            .into_iter()
            .find(|m| m.title.to_lowercase() == title.to_lowercase())
            .map(MediaItem::from)
            .ok_or_else(|| {
                DispatchError::resolution(
                    format!("title {title:?}"),
                    format!("not found in section {:?}", found.title),
                )
            })
    }

    async fn next_unwatched(&self, show: &MediaItem) -> Result<Option<MediaItem>, DispatchError> {
        Ok(self.client.on_deck(&show.id).await?.map(MediaItem::from))
    }

    async fn episodes(&self, show: &MediaItem) -> Result<Vec<MediaItem>, DispatchError> {
        let leaves = self.client.all_leaves(&show.id).await?;
        Ok(leaves.into_iter().map(MediaItem::from).collect())
    }

    async fn shuffled_queue(&self, show: &MediaItem) -> Result<PlayQueue, DispatchError> {
        let queue = self.client.create_play_queue(&show.id, true).await?;
        Ok(PlayQueue {
            id: queue.id.to_string(),
            items: queue.items.into_iter().map(MediaItem::from).collect(),
        })
    }

    async fn controllable_player(&self) -> Result<Option<RegisteredPlayer>, DispatchError> {
        let clients = self.client.clients().await?;
        debug!(count = clients.len(), "registered players");
        Ok(clients
            .into_iter()
            .find(PlayerClient::can_play)
            .map(RegisteredPlayer))
    }

    async fn play_on_player(
        &self,
        player: &RegisteredPlayer,
        media: &PlayableMedia,
    ) -> Result<(), DispatchError> {
        let server = self.client.endpoint();
        let mut request = PlayMediaRequest::new(server, &media.play_key);
        if let Some(queue_id) = &media.queue_id {
            request = request.with_play_queue(queue_id);
        }
        self.client
            .play_on_client(&player.0, &request)
            .await
            .map_err(DispatchError::from_play_command)
    }
}

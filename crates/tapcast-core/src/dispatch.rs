// ── Playback dispatcher ──
//
// resolve → ready the device → pick the item → play it. Resolution runs
// first so a typo on a card never wakes the TV.

use tapcast_api::{PlexClient, RokuClient};
use tracing::{debug, info};

use crate::catalog::{Catalog, PlexCatalog};
use crate::config::{ReadinessConfig, TapcastConfig};
use crate::device::{PlaybackDevice, RokuDevice};
use crate::error::DispatchError;
use crate::model::{ContentKind, MediaItem, PlayableMedia, PlaybackTarget, ShowMode};
use crate::readiness::ReadinessSequencer;

/// How the play command reaches the screen.
///
/// Chosen once per dispatch from whether the catalog knows a directly
/// controllable player; a failing direct player does not fall back.
enum PlayRoute<P> {
    /// A player registered with the server accepts the command itself.
    Direct(P),
    /// Raw command to the device's command channel.
    CommandChannel,
}

/// Plays [`PlaybackTarget`]s on one device.
pub struct Dispatcher<C, D> {
    catalog: C,
    device: D,
    readiness: ReadinessConfig,
}

impl Dispatcher<PlexCatalog, RokuDevice> {
    /// Build the Plex + Roku dispatcher described by `config`.
    pub fn from_config(config: &TapcastConfig) -> Result<Self, DispatchError> {
        let transport = config.transport();
        let plex = PlexClient::new(config.server.clone(), &transport)?;
        let roku = RokuClient::new(&config.device.host, config.device.ecp_port, &transport)?;
        Ok(Self::new(
            PlexCatalog::new(plex),
            RokuDevice::new(roku, &config.device, config.server.clone()),
            config.readiness.clone(),
        ))
    }
}

impl<C: Catalog, D: PlaybackDevice> Dispatcher<C, D> {
    pub fn new(catalog: C, device: D, readiness: ReadinessConfig) -> Self {
        Self {
            catalog,
            device,
            readiness,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Play `target`. `Ok(true)` once the play command has been accepted.
    pub async fn dispatch(&self, target: &PlaybackTarget) -> Result<bool, DispatchError> {
        let resolved = self
            .catalog
            .resolve(&target.library_section, &target.title)
            .await?;
        debug!(id = %resolved.id, title = %resolved.title, "resolved target");

        ReadinessSequencer::new(&self.device, &self.readiness)
            .ensure_ready()
            .await?;

        let media = self.select(target, &resolved).await?;
        info!("Playing {}", media.display_name);
        self.play(&media).await?;
        Ok(true)
    }

    async fn select(
        &self,
        target: &PlaybackTarget,
        resolved: &MediaItem,
    ) -> Result<PlayableMedia, DispatchError> {
        match (target.content_kind, target.mode) {
            (ContentKind::Movie, _) => Ok(PlayableMedia {
                play_key: resolved.play_key.clone(),
                queue_id: None,
                display_name: format!("movie: {}", resolved.title),
            }),
            (ContentKind::Series, ShowMode::Next) => {
                let episode = self.next_episode(resolved).await?;
                Ok(PlayableMedia {
                    play_key: episode.play_key.clone(),
                    queue_id: None,
                    display_name: format!("{} - {}", resolved.title, episode.label()),
                })
            }
            (ContentKind::Series, ShowMode::Shuffle) => {
                let queue = self.catalog.shuffled_queue(resolved).await?;
                let Some(first) = queue.items.first() else {
                    return Err(DispatchError::resolution(
                        format!("queue for {:?}", resolved.title),
                        "shuffled queue is empty",
                    ));
                };
                debug!(queue_id = %queue.id, items = queue.items.len(), "shuffled queue");
                Ok(PlayableMedia {
                    play_key: first.play_key.clone(),
                    queue_id: Some(queue.id.clone()),
                    display_name: format!("{} (shuffled)", resolved.title),
                })
            }
        }
    }

    /// On-deck episode, else the first in (season, episode) order.
    async fn next_episode(&self, show: &MediaItem) -> Result<MediaItem, DispatchError> {
        if let Some(episode) = self.catalog.next_unwatched(show).await? {
            return Ok(episode);
        }
        debug!(show = %show.title, "nothing on deck, starting from the top");
        self.catalog
            .episodes(show)
            .await?
            .into_iter()
            .min_by_key(MediaItem::episode_order)
            .ok_or_else(|| {
                DispatchError::resolution(
                    format!("episodes of {:?}", show.title),
                    "series has no episodes",
                )
            })
    }

    async fn route(&self) -> Result<PlayRoute<C::Player>, DispatchError> {
        Ok(match self.catalog.controllable_player().await? {
            Some(player) => PlayRoute::Direct(player),
            None => PlayRoute::CommandChannel,
        })
    }

    async fn play(&self, media: &PlayableMedia) -> Result<(), DispatchError> {
        match self.route().await? {
            PlayRoute::Direct(player) => {
                debug!(%player, "playing via registered player");
                self.catalog.play_on_player(&player, media).await
            }
            PlayRoute::CommandChannel => {
                debug!(port = self.device.command_port(), "playing via command channel");
                self.device.send_play(media).await
            }
        }
    }
}

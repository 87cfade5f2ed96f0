// ── Playback device ──
//
// The box attached to the TV. It has to be woken, have the player app
// brought up, and only then accepts commands on a secondary port.

use std::future::Future;
use std::time::Duration;

use tapcast_api::{
    CompanionEndpoint, Error as ApiError, PlayMediaRequest, RokuClient, ServerEndpoint,
};
use tracing::{debug, warn};

use crate::config::DeviceConfig;
use crate::error::DispatchError;
use crate::model::PlayableMedia;

/// Control surface of a remote playback device.
pub trait PlaybackDevice: Send + Sync {
    /// Whether the device is idling (screensaver) and needs waking.
    fn is_dormant(&self) -> impl Future<Output = Result<bool, DispatchError>> + Send;

    /// Nudge the device out of its idle state.
    fn wake(&self) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Launch the player app, or bring it to the foreground.
    fn launch_player_app(&self) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Port the player app accepts commands on once it is up.
    fn command_port(&self) -> u16;

    /// One bounded connection attempt against [`Self::command_port`].
    fn probe_command_channel(&self, timeout: Duration) -> impl Future<Output = bool> + Send;

    /// Raw play command over the command channel.
    fn send_play(
        &self,
        media: &PlayableMedia,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// A Roku running the Plex app.
pub struct RokuDevice {
    client: RokuClient,
    app_id: String,
    companion: CompanionEndpoint,
    server: ServerEndpoint,
}

impl RokuDevice {
    pub fn new(client: RokuClient, config: &DeviceConfig, server: ServerEndpoint) -> Self {
        Self {
            client,
            app_id: config.app_id.clone(),
            companion: config.companion.clone(),
            server,
        }
    }
}

/// ECP answers non-2xx for keys and apps it doesn't know; the launch or
/// keypress either happened or it didn't, and readiness finds out which.
fn tolerate_status(action: &str, result: Result<(), ApiError>) -> Result<(), DispatchError> {
    match result {
        Err(ApiError::Http { status, message }) => {
            warn!(action, status, %message, "device rejected request, continuing");
            Ok(())
        }
        other => Ok(other?),
    }
}

impl PlaybackDevice for RokuDevice {
    async fn is_dormant(&self) -> Result<bool, DispatchError> {
        Ok(self.client.screensaver_active().await?)
    }

    async fn wake(&self) -> Result<(), DispatchError> {
        debug!(host = self.client.host(), "waking device");
        tolerate_status("wake", self.client.keypress("Home").await)
    }

    async fn launch_player_app(&self) -> Result<(), DispatchError> {
        debug!(host = self.client.host(), app_id = %self.app_id, "launching player app");
        tolerate_status("launch", self.client.launch(&self.app_id).await)
    }

    fn command_port(&self) -> u16 {
        self.companion.port
    }

    async fn probe_command_channel(&self, timeout: Duration) -> bool {
        self.client.probe_port(self.companion.port, timeout).await
    }

    async fn send_play(&self, media: &PlayableMedia) -> Result<(), DispatchError> {
        let mut request = PlayMediaRequest::new(&self.server, &media.play_key);
        if let Some(queue_id) = &media.queue_id {
            request = request.with_play_queue(queue_id);
        }
        self.client
            .companion_play(&self.companion, &request)
            .await
            .map_err(DispatchError::from_play_command)
    }
}

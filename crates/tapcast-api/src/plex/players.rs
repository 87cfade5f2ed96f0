// Plex player registry and direct remote control
//
// Players that announce themselves to the server (GDM or a signed-in
// Plex app) show up under `/clients` and accept remote-control commands
// on their own address.

use tracing::debug;

use super::client::PlexClient;
use super::models::{ClientContainer, PlayerClient};
use crate::error::{Error, status_error};
use crate::play_media::PlayMediaRequest;

impl PlexClient {
    /// List players currently registered with the server.
    ///
    /// `GET /clients`
    pub async fn clients(&self) -> Result<Vec<PlayerClient>, Error> {
        debug!("listing registered players");
        let container: ClientContainer = self.get("/clients", &[]).await?;
        Ok(container.servers)
    }

    /// Send a `playMedia` command straight to a registered player.
    ///
    /// `GET http://{address}:{port}/player/playback/playMedia` with the
    /// player's machine identifier as `X-Plex-Target-Client-Identifier`.
    pub async fn play_on_client(
        &self,
        player: &PlayerClient,
        request: &PlayMediaRequest<'_>,
    ) -> Result<(), Error> {
        let url = format!(
            "http://{}:{}/player/playback/playMedia",
            player.address, player.port
        );
        debug!(player = %player.name, key = request.key(), "playMedia via registered player");

        let resp = self
            .http()
            .get(url)
            .header("X-Plex-Target-Client-Identifier", &player.machine_identifier)
            .query(request)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(status_error(resp).await)
        }
    }
}

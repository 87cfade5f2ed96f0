// Query parameters for the Plex remote-control `playMedia` command.
//
// The same command is understood by a player registered with the server
// (`/player/playback/playMedia` on the player's own address) and by the
// Roku Plex app's companion port. Both paths build one of these.

use secrecy::ExposeSecret;
use serde::Serialize;

use crate::plex::ServerEndpoint;

/// `containerKey` window used when a play queue is attached.
const QUEUE_WINDOW: u32 = 100;

/// Parameters of a `playMedia` command.
///
/// Borrowed from the server endpoint so the token is only exposed at the
/// moment the query string is serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayMediaRequest<'a> {
    provider_identifier: &'static str,
    machine_identifier: &'a str,
    protocol: &'a str,
    address: &'a str,
    port: String,
    key: &'a str,
    token: &'a str,
    #[serde(rename = "type")]
    media_type: &'static str,
    #[serde(rename = "commandID")]
    command_id: String,
    offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    container_key: Option<String>,
}

impl<'a> PlayMediaRequest<'a> {
    /// Build a command that plays `key` from `server`.
    pub fn new(server: &'a ServerEndpoint, key: &'a str) -> Self {
        Self {
            provider_identifier: "com.plexapp.plugins.library",
            machine_identifier: &server.machine_id,
            protocol: &server.scheme,
            address: &server.host,
            port: server.port.to_string(),
            key,
            token: server.token.expose_secret(),
            media_type: "video",
            command_id: "1".into(),
            offset: 0,
            container_key: None,
        }
    }

    /// Attach a play queue so the player pulls subsequent items from it.
    pub fn with_play_queue(mut self, queue_id: &str) -> Self {
        self.container_key = Some(format!(
            "/playQueues/{queue_id}?window={QUEUE_WINDOW}&own=1"
        ));
        self
    }

    /// The media key this command plays.
    pub fn key(&self) -> &str {
        self.key
    }

    /// The `containerKey` parameter, present only for queued playback.
    pub fn container_key(&self) -> Option<&str> {
        self.container_key.as_deref()
    }
}

// Plex Media Server client modules
//
// Hand-written client for the subset of the Plex HTTP API the dispatcher
// needs: library lookups, on-deck and episode listings, play queues and
// the registry of remotely controllable players.

pub mod client;
pub mod library;
pub mod models;
pub mod players;

use secrecy::SecretString;

pub use client::PlexClient;

/// Where the Plex Media Server lives and how to authenticate with it.
///
/// Players receive these values verbatim inside `playMedia` commands so
/// they can stream from the server themselves.
#[derive(Debug, Clone)]
pub struct ServerEndpoint {
    /// `http` or `https`.
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// `X-Plex-Token` sent with every request.
    pub token: SecretString,
    /// The server's `machineIdentifier`.
    pub machine_id: String,
}

impl ServerEndpoint {
    /// `scheme://host:port/`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/", self.scheme, self.host, self.port)
    }
}

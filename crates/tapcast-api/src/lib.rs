// tapcast-api: Async HTTP clients for Plex Media Server and Roku ECP
//
// Two transports live here:
// - `plex` talks JSON to a Plex Media Server (library lookups, play queues,
//   the registry of directly-controllable players).
// - `roku` drives a Roku over its External Control Protocol and issues raw
//   `playMedia` commands to the Plex app's companion port.

pub mod error;
pub mod play_media;
pub mod plex;
pub mod roku;
pub mod transport;

pub use error::Error;
pub use play_media::PlayMediaRequest;
pub use plex::PlexClient;
pub use plex::models::{LibrarySection, MediaKind, Metadata, PlayQueue, PlayerClient};
pub use plex::ServerEndpoint;
pub use roku::{CompanionEndpoint, RokuClient};
pub use transport::{TlsMode, TransportConfig};

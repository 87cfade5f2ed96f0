// ── Runtime configuration ──
//
// These types describe *what* to talk to and *how patiently*. They carry
// the Plex token and timing knobs, but never touch disk. The binary builds
// a `TapcastConfig` from the config file and hands it in.

use std::time::Duration;

use tapcast_api::{CompanionEndpoint, ServerEndpoint, TlsMode, TransportConfig};

use crate::model::CardMap;

/// Timing of the wake → launch → wait-for-port sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessConfig {
    /// Number of connection attempts against the command channel port.
    pub attempts: u32,
    /// Pause between attempts; also bounds each connection attempt.
    pub interval: Duration,
    /// Pause after waking the device from its screensaver.
    pub wake_settle: Duration,
    /// Pause after the port opens, before the first command is sent.
    pub connect_settle: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
            wake_settle: Duration::from_secs(2),
            connect_settle: Duration::from_secs(3),
        }
    }
}

/// Debounce window and per-poll reader timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Same-card repeats inside this window are suppressed.
    pub window: Duration,
    /// Upper bound of a single reader poll.
    pub poll_timeout: Duration,
}

impl DebounceConfig {
    /// Short window used while registering cards, so a deliberate
    /// re-tap registers as a new event.
    pub fn registration() -> Self {
        Self {
            window: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5),
            poll_timeout: Duration::from_millis(500),
        }
    }
}

/// The playback device: a Roku running the Plex app.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub host: String,
    /// ECP port (8060 on every Roku).
    pub ecp_port: u16,
    /// Channel id of the Plex app (13535 in the Roku store).
    pub app_id: String,
    /// Companion port and the identity presented on it.
    pub companion: CompanionEndpoint,
}

/// Everything the daemon and the one-shot commands need.
///
/// Built by the binary, passed to [`Dispatcher`](crate::Dispatcher) and
/// [`Daemon`](crate::Daemon) -- core never reads config files.
#[derive(Debug, Clone)]
pub struct TapcastConfig {
    pub server: ServerEndpoint,
    pub device: DeviceConfig,
    pub readiness: ReadinessConfig,
    pub debounce: DebounceConfig,
    /// Upper bound for every outbound HTTP request.
    pub request_timeout: Duration,
    /// Accept self-signed certificates from the Plex server.
    pub insecure: bool,
    pub cards: CardMap,
}

impl TapcastConfig {
    /// Transport settings shared by the Plex and Roku clients.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: self.request_timeout,
        }
    }
}

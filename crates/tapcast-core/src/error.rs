// ── Dispatch error types ──
//
// Everything that can go wrong between "card recognised" and "play command
// accepted". The daemon matches on these only to word its log line; every
// variant ends the current tap and nothing else.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Library section, title, or episode lookup failed.
    #[error("Cannot resolve {what}: {message}")]
    Resolution { what: String, message: String },

    /// The device's command channel never became reachable.
    #[error("Command channel port {port} not reachable after {attempts} attempts")]
    ReadinessTimeout { port: u16, attempts: u32 },

    /// The play command was rejected.
    #[error("Play command failed: {message}")]
    Command {
        message: String,
        /// HTTP status code (if the device answered at all).
        status: Option<u16>,
    },

    /// Collaborator-level fault (transport, decoding, auth).
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// Client construction failed (bad URL, TLS setup, token).
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DispatchError {
    /// Short machine-friendly label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "resolution",
            Self::ReadinessTimeout { .. } => "readiness-timeout",
            Self::Command { .. } => "command",
            Self::Api { .. } => "api",
            Self::Config { .. } => "config",
        }
    }

    pub(crate) fn resolution(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Reclassify an HTTP rejection of a play command as [`Self::Command`].
    pub(crate) fn from_play_command(err: tapcast_api::Error) -> Self {
        match err {
            tapcast_api::Error::Http { status, message } => Self::Command {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            // A player answering 401 rejected the command, not our Plex token.
            tapcast_api::Error::Unauthorized => Self::Command {
                message: "HTTP 401: unauthorized".into(),
                status: Some(401),
            },
            other => other.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tapcast_api::Error> for DispatchError {
    fn from(err: tapcast_api::Error) -> Self {
        match err {
            tapcast_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            tapcast_api::Error::Tls(msg) => Self::Config {
                message: format!("TLS error: {msg}"),
            },
            tapcast_api::Error::InvalidToken(msg) => Self::Config {
                message: format!("Invalid Plex token: {msg}"),
            },
            other => Self::Api {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

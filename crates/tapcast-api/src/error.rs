use thiserror::Error;

/// Top-level error type for the `tapcast-api` crate.
///
/// Covers every failure mode of the Plex and Roku transports.
/// `tapcast-core` folds these into its dispatch error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The Plex server rejected the configured token.
    #[error("Plex token rejected (HTTP 401)")]
    Unauthorized,

    /// The configured token cannot be sent as a header value.
    #[error("Invalid Plex token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// Non-success HTTP status from Plex, the Roku, or a player.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Turn a non-success response into [`Error::Http`], keeping a short body preview.
pub(crate) async fn status_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Error::Unauthorized;
    }
    let raw = resp.text().await.unwrap_or_default();
    let message = if raw.trim().is_empty() {
        status.to_string()
    } else {
        raw.chars().take(200).collect()
    };
    Error::Http {
        status: status.as_u16(),
        message,
    }
}

// Roku External Control Protocol + Plex companion port
//
// ECP (port 8060) is fire-and-forget: keypresses and app launches return
// immediately with no indication of when the app is usable. The Plex app
// opens its companion port once it is able to take remote commands, so the
// port doubles as the only observable readiness signal.

use std::time::Duration;

use serde::Serialize;
use tokio::net::TcpStream;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, status_error};
use crate::play_media::PlayMediaRequest;
use crate::transport::TransportConfig;

/// Default ECP port on every Roku.
pub const ECP_PORT: u16 = 8060;

/// Identity the companion-port command presents to the Plex app.
#[derive(Debug, Clone, Serialize)]
pub struct CompanionEndpoint {
    /// Port the Plex app listens on for remote commands (usually 8324).
    #[serde(skip)]
    pub port: u16,
    #[serde(rename = "X-Plex-Client-Identifier")]
    pub client_id: String,
    #[serde(rename = "X-Plex-Device-Name")]
    pub device_name: String,
    #[serde(rename = "X-Plex-Target-Client-Identifier")]
    pub target_client_id: String,
}

/// HTTP client for a single Roku device.
pub struct RokuClient {
    http: reqwest::Client,
    host: String,
    ecp_url: Url,
}

impl RokuClient {
    /// Build a client for the Roku at `host`, with ECP on `ecp_port`.
    pub fn new(host: &str, ecp_port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, host, ecp_port)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, host: &str, ecp_port: u16) -> Result<Self, Error> {
        let ecp_url = Url::parse(&format!("http://{host}:{ecp_port}/"))?;
        Ok(Self {
            http,
            host: host.to_owned(),
            ecp_url,
        })
    }

    /// The device host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    // ── ECP ──────────────────────────────────────────────────────────

    /// Raw XML describing the foreground app.
    ///
    /// `GET /query/active-app`
    pub async fn active_app(&self) -> Result<String, Error> {
        let url = self.ecp_url.join("query/active-app")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.text().await?)
    }

    /// Whether the device is sitting in its screensaver.
    pub async fn screensaver_active(&self) -> Result<bool, Error> {
        let body = self.active_app().await?;
        trace!(body = %body, "active app");
        Ok(body.contains("<screensaver"))
    }

    /// Press a remote key, e.g. `Home`.
    ///
    /// `POST /keypress/{key}`
    pub async fn keypress(&self, key: &str) -> Result<(), Error> {
        let url = self.ecp_url.join(&format!("keypress/{key}"))?;
        self.post_empty(url).await
    }

    /// Launch (or bring to the foreground) the channel with `app_id`.
    ///
    /// `POST /launch/{app_id}`. Re-launching a running app is harmless.
    pub async fn launch(&self, app_id: &str) -> Result<(), Error> {
        let url = self.ecp_url.join(&format!("launch/{app_id}"))?;
        self.post_empty(url).await
    }

    async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(status_error(resp).await)
        }
    }

    // ── Companion port ───────────────────────────────────────────────

    /// Try one TCP connection to `port`, closing it straight away.
    ///
    /// Returns `false` on refusal, unreachability, or when `timeout` elapses.
    pub async fn probe_port(&self, port: u16, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, TcpStream::connect((self.host.as_str(), port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                trace!(port, error = %e, "probe refused");
                false
            }
            Err(_) => {
                trace!(port, "probe timed out");
                false
            }
        }
    }

    /// Send `playMedia` to the Plex app's companion port.
    ///
    /// `GET http://{host}:{companion.port}/player/playback/playMedia`
    pub async fn companion_play(
        &self,
        companion: &CompanionEndpoint,
        request: &PlayMediaRequest<'_>,
    ) -> Result<(), Error> {
        let url = Url::parse(&format!(
            "http://{}:{}/player/playback/playMedia",
            self.host, companion.port
        ))?;
        debug!(key = request.key(), "playMedia via companion port");

        let resp = self
            .http
            .get(url)
            .query(request)
            .query(companion)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(status_error(resp).await)
        }
    }
}

// Plex Media Server HTTP client
//
// Wraps `reqwest::Client` with Plex-specific URL construction and
// `MediaContainer` envelope unwrapping. Endpoint groups (library, players)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::ServerEndpoint;
use super::models::Envelope;
use crate::error::{Error, status_error};
use crate::transport::TransportConfig;

/// Async client for a single Plex Media Server.
///
/// Every request carries `Accept: application/json` and the server token.
/// All methods return the unwrapped `MediaContainer` payload.
pub struct PlexClient {
    http: reqwest::Client,
    base_url: Url,
    endpoint: ServerEndpoint,
}

impl PlexClient {
    /// Build a client for `endpoint`, injecting the token as a default header.
    pub fn new(endpoint: ServerEndpoint, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut token = HeaderValue::from_str(endpoint.token.expose_secret())
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);
        headers.insert("X-Plex-Token", token);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Url::parse(&endpoint.base_url())?;
        Ok(Self {
            http,
            base_url,
            endpoint,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages default headers).
    pub fn with_client(http: reqwest::Client, endpoint: ServerEndpoint) -> Result<Self, Error> {
        let base_url = Url::parse(&endpoint.base_url())?;
        Ok(Self {
            http,
            base_url,
            endpoint,
        })
    }

    /// The server this client talks to.
    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// The underlying HTTP client (players are reached with it too).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an absolute server path (e.g. `/library/sections`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the `MediaContainer` envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request (query-only, empty body) and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} params={params:?}");

        let resp = self.http.post(url).query(params).send().await?;
        self.parse_envelope(resp).await
    }

    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let body = resp.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        Ok(envelope.media_container)
    }
}

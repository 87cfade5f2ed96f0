//! Configuration for the `tapcast` binary.
//!
//! TOML file + `TAPCAST_` environment overrides, Plex token resolution
//! (env var → keyring → plaintext), and translation into the runtime
//! [`TapcastConfig`] that `tapcast-core` consumes. Core never reads files;
//! everything on disk goes through here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tapcast_api::{CompanionEndpoint, ServerEndpoint};
use tapcast_core::{
    CardId, CardMap, ContentKind, DebounceConfig, DeviceConfig, PlaybackTarget, ReadinessConfig,
    ShowMode, TapcastConfig,
};

/// Keyring service name the Plex token is stored under.
pub const KEYRING_SERVICE: &str = "tapcast";
const KEYRING_TOKEN_USER: &str = "plex-token";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no Plex token configured")]
    NoToken,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Upper bound for every outbound HTTP request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub plex: PlexSection,

    #[serde(default)]
    pub roku: RokuSection,

    #[serde(default)]
    pub companion: CompanionSection,

    #[serde(default)]
    pub reader: ReaderSection,

    #[serde(default)]
    pub readiness: ReadinessSection,

    /// Card UID → what it plays.
    #[serde(default)]
    pub cards: BTreeMap<String, CardEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            plex: PlexSection::default(),
            roku: RokuSection::default(),
            companion: CompanionSection::default(),
            reader: ReaderSection::default(),
            readiness: ReadinessSection::default(),
            cards: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlexSection {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_plex_port")]
    pub port: u16,

    /// `http` or `https`.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Plaintext token (prefer `token_env` or the keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Name of an environment variable holding the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// The server's `machineIdentifier`.
    #[serde(default)]
    pub machine_id: String,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for PlexSection {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_plex_port(),
            scheme: default_scheme(),
            token: None,
            token_env: None,
            machine_id: String::new(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RokuSection {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_ecp_port")]
    pub ecp_port: u16,

    #[serde(default = "default_plex_app_id")]
    pub plex_app_id: String,
}

impl Default for RokuSection {
    fn default() -> Self {
        Self {
            host: String::new(),
            ecp_port: default_ecp_port(),
            plex_app_id: default_plex_app_id(),
        }
    }
}

/// Identity presented to the Plex app's companion port.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanionSection {
    #[serde(default = "default_companion_port")]
    pub port: u16,

    #[serde(default = "default_client_name")]
    pub client_id: String,

    #[serde(default = "default_client_name")]
    pub device_name: String,

    /// Machine identifier of the Plex app on the Roku.
    #[serde(default)]
    pub target_client_id: String,
}

impl Default for CompanionSection {
    fn default() -> Self {
        Self {
            port: default_companion_port(),
            client_id: default_client_name(),
            device_name: default_client_name(),
            target_client_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderSection {
    /// `stdin`, or the path of a FIFO/file a reader driver writes UIDs to.
    #[serde(default = "default_reader_source")]
    pub source: String,

    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,

    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

impl Default for ReaderSection {
    fn default() -> Self {
        Self {
            source: default_reader_source(),
            debounce_secs: default_debounce_secs(),
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessSection {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_wake_settle_secs")]
    pub wake_settle_secs: u64,

    #[serde(default = "default_connect_settle_secs")]
    pub connect_settle_secs: u64,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            interval_secs: default_interval_secs(),
            wake_settle_secs: default_wake_settle_secs(),
            connect_settle_secs: default_connect_settle_secs(),
        }
    }
}

/// One `[cards."<uid>"]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CardEntry {
    #[serde(rename = "type")]
    pub kind: ContentKind,

    pub title: String,

    /// Library section; defaults to "Movies" / "TV Shows".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Show mode; ignored for movies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ShowMode>,
}

impl CardEntry {
    pub fn to_target(&self) -> PlaybackTarget {
        let target = match self.kind {
            ContentKind::Movie => PlaybackTarget::movie(&self.title),
            ContentKind::Series => {
                PlaybackTarget::series(&self.title, self.mode.unwrap_or_default())
            }
        };
        match &self.library {
            Some(section) => target.in_section(section),
            None => target,
        }
    }

    /// Inverse of [`Self::to_target`]; default sections are left implicit.
    pub fn from_target(target: &PlaybackTarget) -> Self {
        let library = (target.library_section != target.content_kind.default_section())
            .then(|| target.library_section.clone());
        let mode = (target.content_kind == ContentKind::Series).then_some(target.mode);
        Self {
            kind: target.content_kind,
            title: target.title.clone(),
            library,
            mode,
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_plex_port() -> u16 {
    32400
}
fn default_scheme() -> String {
    "http".into()
}
fn default_ecp_port() -> u16 {
    tapcast_api::roku::ECP_PORT
}
fn default_plex_app_id() -> String {
    "13535".into()
}
fn default_companion_port() -> u16 {
    8324
}
fn default_client_name() -> String {
    "tapcast".into()
}
fn default_reader_source() -> String {
    "stdin".into()
}
fn default_debounce_secs() -> u64 {
    5
}
fn default_poll_timeout_ms() -> u64 {
    500
}
fn default_attempts() -> u32 {
    30
}
fn default_interval_secs() -> u64 {
    1
}
fn default_wake_settle_secs() -> u64 {
    2
}
fn default_connect_settle_secs() -> u64 {
    3
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tapcast", "tapcast").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tapcast");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` (or the default location) plus environment.
///
/// A missing file is not an error: defaults and env vars still apply.
/// Nested keys use a double underscore, e.g. `TAPCAST_PLEX__HOST`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("TAPCAST_").ignore(&["config"]).split("__"));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the Plex token: `token_env` → system keyring → plaintext.
pub fn resolve_token(plex: &PlexSection) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(val) = plex
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_USER)
        .ok()
        .and_then(|entry| entry.get_password().ok())
    {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    plex.token
        .clone()
        .map(SecretString::from)
        .ok_or(ConfigError::NoToken)
}

/// Store the Plex token in the system keyring.
pub fn store_token(token: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_USER)
        .and_then(|entry| entry.set_password(token))
        .map_err(|e| invalid("keyring", format!("failed to store token: {e}")))
}

// ── Translation to runtime config ───────────────────────────────────

impl Config {
    /// Parse the `[cards]` table into the runtime card map.
    pub fn card_map(&self) -> Result<CardMap, ConfigError> {
        self.cards
            .iter()
            .map(|(uid, entry)| {
                let id = CardId::parse(uid).map_err(|e| invalid("cards", e.to_string()))?;
                Ok((id, entry.to_target()))
            })
            .collect()
    }

    /// Look a card up by its exact UID string.
    pub fn card(&self, id: &CardId) -> Option<&CardEntry> {
        self.cards.get(id.as_str())
    }

    /// Insert or replace the mapping for `id`.
    pub fn set_card(&mut self, id: &CardId, target: &PlaybackTarget) {
        self.cards
            .insert(id.to_string(), CardEntry::from_target(target));
    }

    /// Remove the mapping for `id`, returning it if present.
    pub fn remove_card(&mut self, id: &CardId) -> Option<CardEntry> {
        self.cards.remove(id.as_str())
    }

    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            window: Duration::from_secs(self.reader.debounce_secs),
            poll_timeout: Duration::from_millis(self.reader.poll_timeout_ms),
        }
    }

    pub fn readiness(&self) -> ReadinessConfig {
        ReadinessConfig {
            attempts: self.readiness.attempts,
            interval: Duration::from_secs(self.readiness.interval_secs),
            wake_settle: Duration::from_secs(self.readiness.wake_settle_secs),
            connect_settle: Duration::from_secs(self.readiness.connect_settle_secs),
        }
    }

    /// Validate the `[plex]` table and resolve its token.
    pub fn server(&self) -> Result<ServerEndpoint, ConfigError> {
        if self.plex.host.trim().is_empty() {
            return Err(invalid("plex.host", "must be set"));
        }
        if self.plex.machine_id.trim().is_empty() {
            return Err(invalid(
                "plex.machine_id",
                "must be set (see machineIdentifier at http://<plex>:32400/identity)",
            ));
        }
        Ok(ServerEndpoint {
            scheme: self.plex.scheme.clone(),
            host: self.plex.host.clone(),
            port: self.plex.port,
            token: resolve_token(&self.plex)?,
            machine_id: self.plex.machine_id.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate everything and build the runtime config.
    pub fn to_runtime(&self) -> Result<TapcastConfig, ConfigError> {
        let server = self.server()?;
        if self.roku.host.trim().is_empty() {
            return Err(invalid("roku.host", "must be set"));
        }
        if self.readiness.attempts == 0 {
            return Err(invalid("readiness.attempts", "must be at least 1"));
        }
        if self.readiness.interval_secs == 0 {
            return Err(invalid("readiness.interval_secs", "must be at least 1"));
        }
        if self.reader.poll_timeout_ms == 0 {
            return Err(invalid("reader.poll_timeout_ms", "must be at least 1"));
        }

        Ok(TapcastConfig {
            server,
            device: DeviceConfig {
                host: self.roku.host.clone(),
                ecp_port: self.roku.ecp_port,
                app_id: self.roku.plex_app_id.clone(),
                companion: CompanionEndpoint {
                    port: self.companion.port,
                    client_id: self.companion.client_id.clone(),
                    device_name: self.companion.device_name.clone(),
                    target_client_id: self.companion.target_client_id.clone(),
                },
            },
            readiness: self.readiness(),
            debounce: self.debounce(),
            request_timeout: self.request_timeout(),
            insecure: self.plex.insecure,
            cards: self.card_map()?,
        })
    }
}

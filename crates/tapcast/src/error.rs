//! CLI error types with miette diagnostics.
//!
//! Maps config and dispatch failures into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tapcast_config::ConfigError;
use tapcast_core::DispatchError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach {what}")]
    #[diagnostic(
        code(tapcast::connection_failed),
        help("Check [plex] host/port and [roku] host in your config.\nDetails: {message}")
    )]
    ConnectionFailed { what: String, message: String },

    #[error("Roku command port {port} did not open after {attempts} attempts")]
    #[diagnostic(
        code(tapcast::device_not_ready),
        help(
            "Check that the Roku is on the network and the Plex channel is installed.\n\
             Raise [readiness] attempts if Plex is slow to start."
        )
    )]
    DeviceNotReady { port: u16, attempts: u32 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Plex rejected the token")]
    #[diagnostic(
        code(tapcast::auth_failed),
        help("Store a fresh token with: tapcast config set-token")
    )]
    AuthFailed,

    #[error("No Plex token configured")]
    #[diagnostic(
        code(tapcast::no_token),
        help(
            "Store one with: tapcast config set-token\n\
             Or set [plex] token_env to the name of an environment variable."
        )
    )]
    NoToken,

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(tapcast::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    // ── Playback ─────────────────────────────────────────────────────

    #[error("Play command rejected: {message}")]
    #[diagnostic(code(tapcast::play_rejected))]
    PlayRejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(tapcast::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tapcast::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration incomplete: {field} {reason}")]
    #[diagnostic(
        code(tapcast::config_incomplete),
        help("Edit the config file at: {path}")
    )]
    ConfigIncomplete {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(tapcast::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tapcast::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::DeviceNotReady { .. } => exit_code::TIMEOUT,
            Self::AuthFailed | Self::NoToken => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::ConfigIncomplete { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::ConfigIncomplete {
                field,
                reason,
                path: tapcast_config::config_path().display().to_string(),
            },
            ConfigError::NoToken => Self::NoToken,
            ConfigError::Serialization(e) => Self::Serialization(e),
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

// ── DispatchError → CliError mapping ─────────────────────────────────

impl From<DispatchError> for CliError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Resolution { what, message } => Self::NotFound {
                resource_type: "Plex item".into(),
                identifier: what,
                hint: message,
            },
            DispatchError::ReadinessTimeout { port, attempts } => {
                Self::DeviceNotReady { port, attempts }
            }
            DispatchError::Command { message, .. } => Self::PlayRejected { message },
            DispatchError::Api {
                status: Some(401), ..
            } => Self::AuthFailed,
            DispatchError::Api {
                message,
                status: None,
            } => Self::ConnectionFailed {
                what: "Plex server or Roku".into(),
                message,
            },
            DispatchError::Api { message, .. } => Self::ApiError { message },
            DispatchError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

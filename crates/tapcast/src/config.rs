//! CLI side of configuration: `--config` / `--timeout` overrides on top of
//! `tapcast-config`, and the clients built from the result.

use std::path::PathBuf;

use tapcast_api::{PlexClient, TlsMode, TransportConfig};
use tapcast_config::Config;
use tapcast_core::{DispatchError, PlexCatalog, TapcastConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` / `TAPCAST_CONFIG`, else the default.
pub fn path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tapcast_config::config_path)
}

/// Load the config file with CLI flag overrides applied.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = tapcast_config::load_config(Some(&path(global)))?;
    if let Some(secs) = global.timeout {
        cfg.timeout_secs = secs;
    }
    Ok(cfg)
}

/// Validated runtime config for commands that drive the TV.
pub fn runtime(cfg: &Config) -> Result<TapcastConfig, CliError> {
    Ok(cfg.to_runtime()?)
}

/// A Plex-only catalog; registration never touches the Roku.
pub fn plex_catalog(cfg: &Config) -> Result<PlexCatalog, CliError> {
    let transport = TransportConfig {
        tls: if cfg.plex.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: cfg.request_timeout(),
    };
    let client = PlexClient::new(cfg.server()?, &transport).map_err(DispatchError::from)?;
    Ok(PlexCatalog::new(client))
}

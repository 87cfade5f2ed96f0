//! Config subcommand handlers.

use dialoguer::Password;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::commands::util::prompt_err;
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::path(global).display());
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load(global)?;
            if cfg.plex.token.is_some() {
                cfg.plex.token = Some(REDACTED.into());
            }
            let out = match global.output {
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken => {
            let token = Password::new()
                .with_prompt("Plex token")
                .interact()
                .map_err(prompt_err)?;
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            tapcast_config::store_token(token.trim())?;
            eprintln!("Token stored in system keyring.");
            Ok(())
        }
    }
}

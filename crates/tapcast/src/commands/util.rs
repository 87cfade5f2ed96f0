//! Shared helpers for command handlers.

use std::io::IsTerminal;

use tapcast_core::CardId;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the command must be re-run with `--yes`.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse a UID typed on the command line.
pub fn parse_card(uid: &str) -> Result<CardId, CliError> {
    CardId::parse(uid).map_err(|e| CliError::Validation {
        field: "uid".into(),
        reason: e.to_string(),
    })
}

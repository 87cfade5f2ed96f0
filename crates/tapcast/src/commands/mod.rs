//! Command dispatch: bridges CLI args to config, core and output formatting.

pub mod cards;
pub mod config_cmd;
pub mod play;
pub mod register;
pub mod run;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that reads the config file to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(args, global).await,
        Command::Register(args) => register::handle(args, global).await,
        Command::Play(args) => play::handle(args, global).await,
        Command::Cards(args) => cards::handle(args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}

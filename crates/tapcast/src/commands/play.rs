//! `tapcast play`: one-off playback without a card.

use tapcast_core::{Dispatcher, PlaybackTarget, ShowMode};

use crate::cli::{GlobalOpts, ModeArg, PlayArgs, PlayCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

fn target(cmd: PlayCommand) -> PlaybackTarget {
    let (target, library) = match cmd {
        PlayCommand::Movie { title, library } => (PlaybackTarget::movie(title), library),
        PlayCommand::Show {
            title,
            mode,
            library,
        } => {
            let mode = match mode {
                ModeArg::Next => ShowMode::Next,
                ModeArg::Shuffle => ShowMode::Shuffle,
            };
            (PlaybackTarget::series(title, mode), library)
        }
    };
    match library {
        Some(section) => target.in_section(section),
        None => target,
    }
}

pub async fn handle(args: PlayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::runtime(&cfg)?;
    let dispatcher = Dispatcher::from_config(&runtime)?;

    let target = target(args.command);
    tracing::debug!(title = %target.title, section = %target.library_section, "play");
    dispatcher.dispatch(&target).await?;

    let color = output::should_color(&global.color);
    output::print_output(
        &format!(
            "{} {}",
            output::success("Started", color),
            output::title(&target.title, color)
        ),
        global.quiet,
    );
    Ok(())
}

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity and command
    init_tracing(&cli);

    // Dispatch and handle errors with proper exit codes
    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    // Exiting here skips runtime teardown, which would otherwise wait on a
    // blocking stdin read left behind by `run`.
    let _ = std::io::Write::flush(&mut std::io::stdout());
    std::process::exit(code);
}

/// `RUST_LOG` wins; otherwise the daemon narrates at `info` and one-shot
/// commands stay quiet unless `-v` is given.
fn init_tracing(cli: &Cli) {
    let base: u8 = if cli.command.is_interactive() && !cli.global.quiet {
        1
    } else {
        0
    };
    let filter = match cli.global.verbose.saturating_add(base) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "tapcast", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global).await
        }
    }
}

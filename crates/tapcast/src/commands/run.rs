//! `tapcast run`: the card-tap daemon.

use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tapcast_core::{
    Daemon, Debouncer, Dispatcher, LineReader, PlexCatalog, RokuDevice, TapcastConfig,
};

use crate::cli::{GlobalOpts, ReaderArgs};
use crate::config;
use crate::error::CliError;

/// `[reader] source` value meaning "the terminal".
pub const STDIN_SOURCE: &str = "stdin";

pub async fn handle(args: ReaderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::runtime(&cfg)?;
    let dispatcher = Dispatcher::from_config(&runtime)?;
    let source = args.source.unwrap_or_else(|| cfg.reader.source.clone());

    if runtime.cards.is_empty() {
        warn!("no cards mapped yet; add some with `tapcast register`");
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    info!(source = %source, "reading card UIDs");

    if source == STDIN_SOURCE {
        serve(BufReader::new(tokio::io::stdin()), &runtime, dispatcher, shutdown).await;
    } else {
        let file = tokio::fs::File::open(&source).await?;
        serve(BufReader::new(file), &runtime, dispatcher, shutdown).await;
    }

    if !global.quiet {
        eprintln!("\nShutting down.");
    }
    Ok(())
}

async fn serve<R>(
    input: R,
    runtime: &TapcastConfig,
    dispatcher: Dispatcher<PlexCatalog, RokuDevice>,
    shutdown: CancellationToken,
) where
    R: AsyncBufRead + Unpin + Send,
{
    let debouncer = Debouncer::new(LineReader::new(input), runtime.debounce);
    let mut daemon = Daemon::new(debouncer, runtime.cards.clone(), dispatcher);
    daemon.run(shutdown).await;
}

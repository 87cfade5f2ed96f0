//! `tapcast register`: tap a card, search Plex, save the mapping.

use std::io::ErrorKind;
use std::path::Path;

use dialoguer::{Input, Select};
use tokio::io::BufReader;

use tapcast_config::{Config, save_config};
use tapcast_core::{
    CardId, DebounceConfig, Debouncer, ItemKind, LineReader, MediaItem, PlaybackTarget,
    PlexCatalog, ShowMode,
};

use crate::cli::{GlobalOpts, ReaderArgs};
use crate::commands::run::STDIN_SOURCE;
use crate::commands::util::{self, prompt_err};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Hits kept per library section.
const SEARCH_LIMIT: usize = 10;

const MODE_CHOICES: [&str; 2] = [
    "next - Play next unwatched episode",
    "shuffle - Shuffle all episodes",
];

/// Where registration UIDs come from.
enum Taps {
    /// Typed (or wedge-typed) at the prompt; stdin is shared with dialoguer.
    Prompt,
    /// A reader driver's FIFO, debounced like the daemon but tighter.
    Reader(Debouncer<LineReader<BufReader<tokio::fs::File>>>),
}

impl Taps {
    async fn open(source: &str) -> Result<Self, CliError> {
        if source == STDIN_SOURCE {
            return Ok(Self::Prompt);
        }
        let file = tokio::fs::File::open(source).await?;
        Ok(Self::Reader(Debouncer::new(
            LineReader::new(BufReader::new(file)),
            DebounceConfig::registration(),
        )))
    }

    /// Next card, or `None` when the user is finished.
    async fn next(&mut self) -> Result<Option<CardId>, CliError> {
        match self {
            Self::Prompt => loop {
                let raw: String = match Input::new()
                    .with_prompt("Tap a card (blank to finish)")
                    .allow_empty(true)
                    .interact_text()
                {
                    Ok(raw) => raw,
                    Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::Interrupted => {
                        return Ok(None);
                    }
                    Err(e) => return Err(prompt_err(e)),
                };
                if raw.trim().is_empty() {
                    return Ok(None);
                }
                match CardId::parse(&raw) {
                    Ok(card) => return Ok(Some(card)),
                    Err(e) => eprintln!("{e}"),
                }
            },
            Self::Reader(debouncer) => loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => return Ok(None),
                    card = debouncer.poll() => {
                        if card.is_some() {
                            return Ok(card);
                        }
                    }
                }
            },
        }
    }
}

pub async fn handle(args: ReaderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::path(global);
    let mut cfg = config::load(global)?;
    let catalog = config::plex_catalog(&cfg)?;
    let source = args.source.unwrap_or_else(|| cfg.reader.source.clone());
    let color = output::should_color(&global.color);

    let mut taps = Taps::open(&source).await?;
    if !matches!(taps, Taps::Prompt) {
        eprintln!("Tap a card to register it (Ctrl-C to finish).");
    }

    while let Some(card) = taps.next().await? {
        if register_card(&card, &mut cfg, &catalog, global, color).await? {
            save_mappings(&cfg, &path)?;
        }
    }

    eprintln!("Done.");
    Ok(())
}

fn save_mappings(cfg: &Config, path: &Path) -> Result<(), CliError> {
    save_config(cfg, path)?;
    tracing::debug!(cards = cfg.cards.len(), "mappings saved");
    Ok(())
}

/// Walk one card through search and selection. `true` if `cfg` changed.
async fn register_card(
    card: &CardId,
    cfg: &mut Config,
    catalog: &PlexCatalog,
    global: &GlobalOpts,
    color: bool,
) -> Result<bool, CliError> {
    println!("Card UID: {card}");

    if let Some(existing) = cfg.card(card) {
        println!("Already mapped to: {} ({})", existing.title, existing.kind);
        if !util::confirm("Overwrite?", global.yes, "overwrite card")? {
            return Ok(false);
        }
    }

    let query: String = Input::new()
        .with_prompt("Search for a title")
        .interact_text()
        .map_err(prompt_err)?;

    let results = catalog.search(query.trim(), SEARCH_LIMIT).await?;
    if results.is_empty() {
        println!("No results.");
        return Ok(false);
    }

    let labels: Vec<String> = results.iter().map(result_label).collect();
    let Some(choice) = Select::new()
        .with_prompt("Pick a title")
        .items(labels.as_slice())
        .default(0)
        .interact_opt()
        .map_err(prompt_err)?
    else {
        return Ok(false);
    };
    let Some(item) = results.get(choice) else {
        return Ok(false);
    };

    let Some(target) = target_for(item)? else {
        return Ok(false);
    };
    cfg.set_card(card, &target);
    println!(
        "{} {card} -> {}",
        output::success("Saved:", color),
        output::title(&item.title, color)
    );
    Ok(true)
}

/// Ask for the show mode where needed. `None` if the prompt was skipped.
fn target_for(item: &MediaItem) -> Result<Option<PlaybackTarget>, CliError> {
    let target = if item.kind == ItemKind::Show {
        let Some(choice) = Select::new()
            .with_prompt("Playback mode")
            .items(&MODE_CHOICES)
            .default(0)
            .interact_opt()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        let mode = if choice == 1 {
            ShowMode::Shuffle
        } else {
            ShowMode::Next
        };
        PlaybackTarget::series(&item.title, mode)
    } else {
        PlaybackTarget::movie(&item.title)
    };

    Ok(Some(match &item.section {
        Some(section) => target.in_section(section),
        None => target,
    }))
}

/// `[Section] Title (N episodes)` for shows, `[Section] Title (year)` otherwise.
fn result_label(item: &MediaItem) -> String {
    let section = item.section.as_deref().unwrap_or("?");
    let detail = match (item.kind, item.episode_count, item.year) {
        (ItemKind::Show, Some(n), _) => format!(" ({n} episodes)"),
        (_, _, Some(year)) => format!(" ({year})"),
        _ => String::new(),
    };
    format!("[{section}] {}{detail}", item.title)
}

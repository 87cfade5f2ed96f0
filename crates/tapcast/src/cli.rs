//! Clap derive structures for the `tapcast` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tapcast -- tap an NFC card, watch it on the TV
#[derive(Debug, Parser)]
#[command(
    name = "tapcast",
    version,
    about = "Play Plex movies and shows on a Roku by tapping NFC cards",
    long_about = "Maps NFC card UIDs to Plex titles and plays them on a Roku.\n\n\
        `tapcast run` reads UIDs from a keyboard-wedge reader on stdin (or a\n\
        FIFO fed by a reader driver), wakes the TV, launches Plex and starts\n\
        the mapped movie, next episode or shuffled show.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "TAPCAST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait for card taps and play what they map to
    Run(ReaderArgs),

    /// Map cards to titles interactively
    #[command(alias = "reg")]
    Register(ReaderArgs),

    /// Play a title once, without a card
    Play(PlayArgs),

    /// Inspect and edit card mappings
    Cards(CardsArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// Long-running commands narrate at `info` by default.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Run(_) | Self::Register(_))
    }
}

// ── Reader ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReaderArgs {
    /// Where card UIDs come from: `stdin` or a FIFO/file path
    /// (overrides `[reader] source`)
    #[arg(long, short = 's')]
    pub source: Option<String>,
}

// ── Play ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PlayArgs {
    #[command(subcommand)]
    pub command: PlayCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlayCommand {
    /// Play a movie
    Movie {
        /// Exact movie title
        title: String,

        /// Library section (default: Movies)
        #[arg(long, short = 'l')]
        library: Option<String>,
    },

    /// Play a show
    Show {
        /// Exact show title
        title: String,

        /// Which episode to start with
        #[arg(long, short = 'm', default_value = "next")]
        mode: ModeArg,

        /// Library section (default: TV Shows)
        #[arg(long, short = 'l')]
        library: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Next unwatched episode, else the first
    Next,
    /// Shuffle the whole show
    Shuffle,
}

// ── Cards ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub command: CardsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CardsCommand {
    /// List card mappings
    #[command(alias = "ls")]
    List,

    /// Remove a card mapping
    #[command(alias = "rm")]
    Remove {
        /// Card UID exactly as stored
        uid: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the resolved configuration (token redacted)
    Show,

    /// Store the Plex token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Card-to-playback engine between `tapcast-api` and the `tapcast` binary.
//!
//! - **[`Debouncer`]** turns raw [`CardReader`] readings into a clean stream
//!   of "card arrived" events: repeats of the same card inside the debounce
//!   window are dropped, and lifting the card resets the state.
//!
//! - **[`ReadinessSequencer`]** wakes the playback device, launches the
//!   player app, and waits (bounded) for its command channel to open.
//!
//! - **[`Dispatcher`]** resolves a [`PlaybackTarget`] against the
//!   [`Catalog`], brings the device up, picks the concrete item (movie,
//!   next episode, or shuffled queue) and plays it through a registered
//!   player or, failing that, the device's raw command channel.
//!
//! - **[`Daemon`]** composes the three, forever, and keeps one bad tap from
//!   ever taking the loop down.
//!
//! The Plex- and Roku-backed implementations of [`Catalog`] and
//! [`PlaybackDevice`] live in [`catalog`] and [`device`]; tests swap them
//! for in-memory fakes.

pub mod catalog;
pub mod config;
pub mod daemon;
pub mod debounce;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod readiness;
pub mod reader;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, PlexCatalog};
pub use config::{DebounceConfig, DeviceConfig, ReadinessConfig, TapcastConfig};
pub use daemon::{Daemon, TapOutcome};
pub use debounce::Debouncer;
pub use device::{PlaybackDevice, RokuDevice};
pub use dispatch::Dispatcher;
pub use error::DispatchError;
pub use model::{
    CardId, CardMap, ContentKind, InvalidCardId, ItemKind, MediaItem, PlayQueue, PlayableMedia,
    PlaybackTarget, ShowMode,
};
pub use readiness::ReadinessSequencer;
pub use reader::{CardReader, LineReader};

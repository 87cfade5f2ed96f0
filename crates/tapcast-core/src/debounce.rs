// ── Debouncer ──
//
// Readers report the card on every poll for as long as it sits on the
// antenna. The debouncer collapses that into one event per placement:
// the same card again inside the window is swallowed, a different card
// always fires, and an empty poll forgets the last card entirely so
// lift-and-replace is a new tap.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::config::DebounceConfig;
use crate::model::CardId;
use crate::reader::CardReader;

/// Last accepted detection.
#[derive(Debug, Default)]
struct DetectionState {
    last: Option<(CardId, Instant)>,
}

/// Wraps a [`CardReader`] and suppresses repeated reads of the same card.
pub struct Debouncer<R> {
    reader: R,
    window: Duration,
    poll_timeout: Duration,
    state: DetectionState,
}

impl<R: CardReader> Debouncer<R> {
    pub fn new(reader: R, config: DebounceConfig) -> Self {
        Self {
            reader,
            window: config.window,
            poll_timeout: config.poll_timeout,
            state: DetectionState::default(),
        }
    }

    /// Poll the reader once. `Some` only for a new tap.
    pub async fn poll(&mut self) -> Option<CardId> {
        let Some(id) = self.reader.poll(self.poll_timeout).await else {
            // Card lifted (or never there): the next read is always new.
            self.state.last = None;
            return None;
        };

        let now = Instant::now();
        let repeat = self
            .state
            .last
            .as_ref()
            .is_some_and(|(last_id, at)| *last_id == id && now.duration_since(*at) < self.window);
        if repeat {
            trace!(card = %id, "suppressed repeat read");
            return None;
        }

        self.state.last = Some((id.clone(), now));
        Some(id)
    }
}

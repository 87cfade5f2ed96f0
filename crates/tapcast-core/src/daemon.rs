// ── Daemon loop ──
//
// poll → look up → dispatch, strictly one tap at a time. Shutdown is only
// observed while waiting on the reader; a dispatch in flight always runs to
// completion.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::debounce::Debouncer;
use crate::device::PlaybackDevice;
use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::model::{CardId, CardMap};
use crate::reader::CardReader;

/// What happened to one tap.
#[derive(Debug)]
pub enum TapOutcome {
    /// The card is not in the card map.
    Unknown,
    /// The dispatcher completed.
    Dispatched { handled: bool },
    /// The dispatcher failed; already logged.
    Failed(DispatchError),
}

/// Owns the debouncer, the card map and the dispatcher for the process
/// lifetime.
pub struct Daemon<R, C, D> {
    debouncer: Debouncer<R>,
    cards: CardMap,
    dispatcher: Dispatcher<C, D>,
}

impl<R, C, D> Daemon<R, C, D>
where
    R: CardReader,
    C: Catalog,
    D: PlaybackDevice,
{
    pub fn new(debouncer: Debouncer<R>, cards: CardMap, dispatcher: Dispatcher<C, D>) -> Self {
        Self {
            debouncer,
            cards,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<C, D> {
        &self.dispatcher
    }

    /// Handle one debounced tap. Never fails; failures are logged and
    /// returned for inspection.
    pub async fn handle_tap(&self, card: &CardId) -> TapOutcome {
        let Some(target) = self.cards.get(card) else {
            warn!(%card, "Unknown card: {card}");
            return TapOutcome::Unknown;
        };

        info!(%card, kind = %target.content_kind, title = %target.title, "card tapped");
        match self.dispatcher.dispatch(target).await {
            Ok(handled) => TapOutcome::Dispatched { handled },
            Err(e) => {
                error!(%card, kind = e.kind(), error = %e, "tap failed");
                TapOutcome::Failed(e)
            }
        }
    }

    /// Run until `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(cards = self.cards.len(), "waiting for cards");
        loop {
            let card = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                card = self.debouncer.poll() => card,
            };
            let Some(card) = card else { continue };
            debug!(%card, "new tap");
            self.handle_tap(&card).await;
        }
        info!("shutting down");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::config::{DebounceConfig, ReadinessConfig};
    use crate::model::{ItemKind, PlaybackTarget, ShowMode};
    use crate::testing::{FakeCatalog, FakeDevice, episode, item};

    /// Replays readings, then cancels the token once the script runs dry.
    struct Scripted {
        readings: VecDeque<Option<&'static str>>,
        done: CancellationToken,
    }

    impl CardReader for Scripted {
        async fn poll(&mut self, timeout: Duration) -> Option<CardId> {
            tokio::time::sleep(timeout).await;
            match self.readings.pop_front() {
                Some(r) => r.map(|raw| CardId::parse(raw).unwrap()),
                None => {
                    self.done.cancel();
                    None
                }
            }
        }
    }

    fn cards() -> CardMap {
        CardMap::from([(
            CardId::parse("04A1B2").unwrap(),
            PlaybackTarget::series("Example Show", ShowMode::Next),
        )])
    }

    fn catalog() -> FakeCatalog {
        let mut catalog =
            FakeCatalog::with_item("TV Shows", item("100", "Example Show", ItemKind::Show));
        catalog.on_deck = Some(episode("205", 2, 5));
        catalog
    }

    fn daemon(
        readings: &[Option<&'static str>],
        catalog: FakeCatalog,
        device: FakeDevice,
        done: &CancellationToken,
    ) -> Daemon<Scripted, FakeCatalog, FakeDevice> {
        let reader = Scripted {
            readings: readings.iter().copied().collect(),
            done: done.clone(),
        };
        Daemon::new(
            Debouncer::new(reader, DebounceConfig::default()),
            cards(),
            Dispatcher::new(catalog, device, ReadinessConfig::default()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_card_does_no_work() {
        let done = CancellationToken::new();
        let d = daemon(&[], catalog(), FakeDevice::ready(), &done);

        let outcome = d.handle_tap(&CardId::parse("ffff").unwrap()).await;

        assert!(matches!(outcome, TapOutcome::Unknown));
        assert_eq!(d.dispatcher().catalog().lookups(), 0);
        assert!(d.dispatcher().device().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_returned_not_raised() {
        let done = CancellationToken::new();
        let d = daemon(&[], FakeCatalog::default(), FakeDevice::ready(), &done);

        let outcome = d.handle_tap(&CardId::parse("04A1B2").unwrap()).await;

        assert!(matches!(outcome, TapOutcome::Failed(DispatchError::Resolution { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn loop_survives_failures_and_plays_each_tap_once() {
        let done = CancellationToken::new();
        // Unknown card, then the mapped card held for three polls.
        let script = [Some("ffff"), None, Some("04A1B2"), Some("04A1B2"), Some("04A1B2")];
        let mut d = daemon(&script, catalog(), FakeDevice::ready(), &done);

        d.run(done.clone()).await;

        let sent = d.dispatcher().device().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].play_key, "/library/metadata/205");
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_timeout_does_not_stop_the_loop() {
        let done = CancellationToken::new();
        let script = [Some("04A1B2"), None, Some("04A1B2")];
        let mut d = daemon(&script, catalog(), FakeDevice::default(), &done);

        d.run(done.clone()).await;

        // Both taps went through the full probe loop.
        assert_eq!(d.dispatcher().device().probes(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_exits_immediately() {
        let done = CancellationToken::new();
        done.cancel();
        let mut d = daemon(&[Some("04A1B2")], catalog(), FakeDevice::ready(), &done);

        d.run(done.clone()).await;

        assert!(d.dispatcher().device().calls().is_empty());
    }
}

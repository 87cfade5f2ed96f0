// ── Card readers ──
//
// A reader answers one question per call: which card is on the antenna
// right now, if any. Hardware drivers live outside this crate; the
// `LineReader` covers USB readers that type the UID like a keyboard and
// driver processes that write UIDs to a FIFO.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::model::CardId;

/// Source of raw card readings.
pub trait CardReader: Send {
    /// Wait at most `timeout` for a card. `None` means no card is present.
    fn poll(&mut self, timeout: Duration) -> impl Future<Output = Option<CardId>> + Send;
}

/// Reader fed by newline-terminated hex UIDs.
///
/// Each poll yields at most one line. Blank or malformed lines, timeouts,
/// and EOF all read as "no card".
pub struct LineReader<R> {
    input: R,
    /// Bytes of a line still being typed when the last poll timed out.
    pending: Vec<u8>,
    eof: bool,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: Vec::new(),
            eof: false,
        }
    }

    fn take_line(&mut self) -> Option<CardId> {
        let raw = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        if raw.trim().is_empty() {
            return None;
        }
        match CardId::parse(&raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "ignoring reader line");
                None
            }
        }
    }
}

impl<R> CardReader for LineReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn poll(&mut self, timeout: Duration) -> Option<CardId> {
        if self.eof {
            tokio::time::sleep(timeout).await;
            return None;
        }

        // `read_until` keeps partial bytes in `pending` across a timeout,
        // so a line split over two polls is not lost.
        match tokio::time::timeout(timeout, self.input.read_until(b'\n', &mut self.pending)).await
        {
            Err(_) => None,
            Ok(Ok(0)) => {
                debug!("reader input closed");
                self.eof = true;
                self.take_line()
            }
            Ok(Ok(_)) => self.take_line(),
            Ok(Err(e)) => {
                warn!(error = %e, "reader input failed, treating as closed");
                self.eof = true;
                None
            }
        }
    }
}

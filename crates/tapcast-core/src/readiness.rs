// ── Readiness sequencer ──
//
// Wake → launch → poll the command port. The device gives no signal when
// its player app is usable except that the port starts accepting
// connections, so the wait is a bounded probe loop.

use tracing::{debug, info, warn};

use crate::config::ReadinessConfig;
use crate::device::PlaybackDevice;
use crate::error::DispatchError;

/// Brings a [`PlaybackDevice`] to the point where it accepts play commands.
pub struct ReadinessSequencer<'a, D> {
    device: &'a D,
    config: &'a ReadinessConfig,
}

impl<'a, D: PlaybackDevice> ReadinessSequencer<'a, D> {
    pub fn new(device: &'a D, config: &'a ReadinessConfig) -> Self {
        Self { device, config }
    }

    /// Run the full sequence once.
    ///
    /// At most `attempts` probes are made, `interval` apart; the launch is
    /// issued unconditionally since re-launching a running app is harmless.
    pub async fn ensure_ready(&self) -> Result<(), DispatchError> {
        if self.device.is_dormant().await? {
            info!("device is idle, waking it");
            self.device.wake().await?;
            tokio::time::sleep(self.config.wake_settle).await;
        }

        self.device.launch_player_app().await?;

        let port = self.device.command_port();
        let attempts = self.config.attempts;
        for attempt in 1..=attempts {
            if self.device.probe_command_channel(self.config.interval).await {
                debug!(port, attempt, "command channel open");
                tokio::time::sleep(self.config.connect_settle).await;
                return Ok(());
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        warn!(port, attempts, "command channel never opened");
        Err(DispatchError::ReadinessTimeout { port, attempts })
    }
}

//! Owned, cancellable one-second countdown.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument};

/// Length of one countdown step.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running countdown.
///
/// Sends one message per period until cancelled or dropped. The task holds
/// only a weak sender, so it never keeps the receiving side alive.
#[derive(Debug)]
pub struct Countdown {
    epoch: u64,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Starts sending `make_tick()` every `period`, first one a full period
    /// from now.
    #[instrument(skip(sink, make_tick))]
    pub fn start<M, F>(
        epoch: u64,
        period: Duration,
        sink: WeakUnboundedSender<M>,
        make_tick: F,
    ) -> Self
    where
        M: Send + 'static,
        F: Fn() -> M + Send + 'static,
    {
        debug!("Starting countdown");
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(sink) = sink.upgrade() else {
                    break;
                };
                if sink.send(make_tick()).is_err() {
                    break;
                }
            }
        });
        Self { epoch, handle }
    }

    /// Identifies this countdown among restarts.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stops the countdown.
    pub fn cancel(self) {
        debug!(epoch = self.epoch, "Cancelling countdown");
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//! Periodic refresh ticks.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::WeatherServiceMessage;

/// Handle to a running tick task. The task stops when this is stopped or
/// dropped, so the timer cannot outlive its model.
#[derive(Debug)]
pub struct AutoRefreshTimer {
    token: CancellationToken,
    generation: u64,
}

impl AutoRefreshTimer {
    /// Start sending `TimerTick { generation }` every `period`, the first one
    /// a full period from now.
    pub fn start(
        runtime: &Handle,
        tx: &UnboundedSender<WeatherServiceMessage>,
        period: Duration,
        generation: u64,
    ) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = tx.clone();

        runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        tracing::debug!("Auto-refresh tick (generation {})", generation);
                        if tx.send(WeatherServiceMessage::TimerTick { generation }).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Auto-refresh timer {} stopped", generation);
        });

        tracing::info!("Auto-refresh every {:?}", period);
        Self { token, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(&self) {
        self.token.cancel();
    }
}

impl Drop for AutoRefreshTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Background task that keeps ticking until `shutdown_signal` is cancelled.
/// It touches no shared state.
pub fn spawn(interval: Duration, shutdown_signal: CancellationToken) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;
        loop {
            tokio::select! {
                _ = shutdown_signal.cancelled() => break,
                _ = ticker.tick() => {
                    ticks += 1;
                    tracing::trace!(ticks, "heartbeat");
                }
            }
        }
        tracing::debug!(ticks, "heartbeat stopped");
        ticks
    })
}

use crate::services::{LineSource, Publisher};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Ingestion relay: republish a line-oriented source onto the broker topic
///
/// Runs as an independent task with no coordination against the
/// recommendation pipeline; the two only meet through the broker and the
/// index. The pause between records is a throttle, not backpressure — the
/// pace is fixed regardless of publish latency.
pub struct Relay<P> {
    publisher: P,
    interval: Duration,
}

impl<P: Publisher> Relay<P> {
    pub fn new(publisher: P, interval: Duration) -> Self {
        Self {
            publisher,
            interval,
        }
    }

    /// Relay every line from `source`, pausing `interval` between records
    ///
    /// Per-record publish failures are logged and skipped. Source exhaustion
    /// or a read error ends the task normally. The shutdown channel is
    /// checked during each pause, so the task is cancellable between
    /// iterations.
    ///
    /// Returns the number of successfully published records.
    pub async fn run<L: LineSource>(
        &self,
        mut source: L,
        mut shutdown: watch::Receiver<bool>,
    ) -> usize {
        let mut published = 0usize;

        loop {
            let line = match source.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("Relay source exhausted after {} records", published);
                    break;
                }
                Err(e) => {
                    warn!("Relay source failed, ending relay: {}", e);
                    break;
                }
            };

            debug!("Publishing record via broker");
            match self.publisher.publish(line.as_bytes()).await {
                Ok(()) => published += 1,
                Err(e) => warn!("Failed to publish record, continuing: {}", e),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("Relay shutdown requested after {} records", published);
                    break;
                }
            }
        }

        published
    }
}

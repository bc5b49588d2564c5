//! Market poll cadence
//!
//! Emits a tick on a fixed interval for as long as the app loop is alive.
//! The first tick fires immediately so the panel has data as soon as the
//! backend answers, not one interval later.

use crate::panels::{PanelMsg, UiSender};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct MarketPollScheduler {
    tx: UiSender,
    period: Duration,
}

impl MarketPollScheduler {
    pub fn new(tx: UiSender, period: Duration) -> Self {
        Self { tx, period }
    }

    /// Spawn the tick loop. It ends on its own once the receiving side of
    /// the channel is dropped.
    pub fn start(self) {
        tokio::spawn(async move {
            info!(
                "Market poll scheduler started, every {}s",
                self.period.as_secs()
            );

            let mut ticker = interval(self.period);
            // A stalled loop should not cause a burst of catch-up polls.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if self.tx.send(PanelMsg::MarketTick).is_err() {
                    debug!("Market poll scheduler stopping, channel closed");
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels;

    #[tokio::test]
    async fn ticks_arrive_on_the_channel() {
        let (tx, mut rx) = panels::channel();
        MarketPollScheduler::new(tx, Duration::from_millis(5)).start();

        // First tick is immediate, second after one period.
        assert!(matches!(rx.recv().await, Some(PanelMsg::MarketTick)));
        assert!(matches!(rx.recv().await, Some(PanelMsg::MarketTick)));
    }

    #[tokio::test]
    async fn scheduler_stops_when_the_receiver_is_dropped() {
        let (tx, rx) = panels::channel();
        let probe = tx.clone();
        MarketPollScheduler::new(tx, Duration::from_millis(1)).start();
        drop(rx);

        // Give the loop a moment to observe the closed channel.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(probe.send(PanelMsg::MarketTick).is_err());
    }
}

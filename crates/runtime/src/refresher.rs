use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub struct RefreshTask {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<u64>,
}

impl RefreshTask {
    pub fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        assert!(!period.is_zero(), "refresh period must be non-zero");

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = 0_u64;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        tick();
                        ticks += 1;
                        tracing::trace!(ticks, "refresh tick delivered");
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            return ticks;
                        }
                    }
                }
            }
        });

        Self { stop_tx, join }
    }

    pub async fn stop(self) -> u64 {
        let _ = self.stop_tx.send(true);

        self.join.await.unwrap_or(0)
    }
}

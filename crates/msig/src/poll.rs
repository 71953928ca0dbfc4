//! Interval refetching for `watch`.

use std::{future::Future, time::Duration};
use tokio::time::MissedTickBehavior;

/// Shortest refetch interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Refetches on a fixed interval; every result replaces the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    count: Option<u64>,
}

impl Poller {
    /// The first fetch happens immediately. `interval` is raised to [`MIN_INTERVAL`].
    pub fn new(interval: Duration) -> Self {
        Self { interval: interval.max(MIN_INTERVAL), count: None }
    }

    /// Stops after `count` fetches, runs until shutdown if `None`.
    pub fn count(mut self, count: Option<u64>) -> Self {
        self.count = count;
        self
    }

    /// Runs `fetch` every interval and hands each result to `update` together with its
    /// 1-based tick number. A fetch that is still in flight when `shutdown` resolves is dropped.
    ///
    /// Returns the latest result.
    pub async fn run<T, F, Fut, U, S>(&self, mut fetch: F, mut update: U, shutdown: S) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
        U: FnMut(u64, &T),
        S: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut latest = None;
        let mut ticks = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }

            let snapshot = tokio::select! {
                _ = &mut shutdown => break,
                snapshot = fetch() => snapshot,
            };
            ticks += 1;
            trace!(target: "msig::poll", ticks, "refreshed");
            update(ticks, &snapshot);
            latest = Some(snapshot);

            if self.count.is_some_and(|count| ticks >= count) {
                break;
            }
        }
        latest
    }
}

/// Resolves on ctrl-c.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn stops_after_count() {
        let start = Instant::now();
        let mut fetched = 0u32;
        let mut seen = Vec::new();
        let latest = Poller::new(Duration::from_secs(8))
            .count(Some(3))
            .run(
                || {
                    fetched += 1;
                    let n = fetched;
                    async move { n }
                },
                |tick, n| seen.push((tick, *n)),
                std::future::pending(),
            )
            .await;
        assert_eq!(latest, Some(3));
        assert_eq!(seen, [(1, 1), (2, 2), (3, 3)]);
        assert_eq!(start.elapsed(), Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown() {
        let mut ticks = 0;
        let latest = Poller::new(Duration::from_secs(8))
            .run(
                || async { "snapshot" },
                |tick, _| ticks = tick,
                tokio::time::sleep(Duration::from_secs(17)),
            )
            .await;
        assert_eq!(latest, Some("snapshot"));
        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn drops_in_flight_fetch() {
        let latest = Poller::new(Duration::from_secs(1))
            .run(
                || tokio::time::sleep(Duration::from_secs(60)),
                |_, _| {},
                tokio::time::sleep(Duration::from_secs(5)),
            )
            .await;
        assert_eq!(latest, None);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_raised() {
        let start = Instant::now();
        let latest = Poller::new(Duration::ZERO)
            .count(Some(2))
            .run(|| async { "snapshot" }, |_, _| {}, std::future::pending())
            .await;
        assert_eq!(latest, Some("snapshot"));
        assert_eq!(start.elapsed(), MIN_INTERVAL);
    }
}

//! Fixed-delay retries for read requests.

use std::{fmt::Display, future::Future, time::Duration};

/// A type that keeps track of attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retry {
    retries: u32,
    delay: Duration,
}

impl Default for Retry {
    /// One retry after one second.
    fn default() -> Self {
        Self::new(1, Duration::from_secs(1))
    }
}

impl Retry {
    /// Creates a new `Retry` instance.
    pub const fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A `Retry` that never retries.
    pub const fn never() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Remaining retries.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// The fixed delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn handle_err(&mut self, err: String) {
        self.retries -= 1;
        warn!("erroneous attempt ({} tries remaining): {err}", self.retries);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Runs the given async closure in a loop, retrying if it fails up to the specified number of
    /// times.
    pub async fn run_async<F, Fut, T, E>(mut self, mut callback: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        loop {
            match callback().await {
                Err(e) if self.retries > 0 => self.handle_err(e.to_string()).await,
                res => return res,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_once_after_delay() {
        let attempts = AtomicU32::new(0);
        let start = tokio::time::Instant::now();
        let res: Result<u32, String> = Retry::new(1, Duration::from_secs(1))
            .run_async(|| async {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n == 0 { Err("header not found".to_string()) } else { Ok(n) }
            })
            .await;
        assert_eq!(res, Ok(1));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_retries() {
        let attempts = AtomicU32::new(0);
        let res: Result<(), String> = Retry::default()
            .run_async(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("connection refused".to_string())
            })
            .await;
        assert_eq!(res, Err("connection refused".to_string()));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn never_does_not_retry() {
        let attempts = AtomicU32::new(0);
        let _ = Retry::never()
            .run_async(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("boom")
            })
            .await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

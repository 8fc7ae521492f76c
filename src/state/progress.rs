use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use tokio::time::{Duration, Instant};

/// Shared count of persisted records plus the run clock
///
/// The counter only moves forward and only the sink increments it. Reaching
/// the cap wakes whoever is parked in [`Progress::wait_for_cap`].
#[derive(Debug)]
pub struct Progress {
    total: AtomicU64,
    cap: u64,
    started: Instant,
    cap_reached: Notify,
}

impl Progress {
    pub fn new(cap: u64) -> Self {
        Self {
            total: AtomicU64::new(0),
            cap,
            started: Instant::now(),
            cap_reached: Notify::new(),
        }
    }

    /// Records one successful persist and returns the new total
    pub fn increment(&self) -> u64 {
        let total = self.total.fetch_add(1, Ordering::AcqRel) + 1;
        if total == self.cap {
            self.cap_reached.notify_waiters();
        }
        total
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn is_capped(&self) -> bool {
        self.total() >= self.cap
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Records per second since the run started
    pub fn rate(&self) -> f64 {
        rate(self.total(), self.elapsed())
    }

    /// Resolves once the cap has been reached
    ///
    /// Any number of tasks may wait at once; all of them wake together.
    pub async fn wait_for_cap(&self) {
        let notified = self.cap_reached.notified();
        tokio::pin!(notified);
        // Registered before the check so an increment in between still wakes us
        notified.as_mut().enable();

        if self.is_capped() {
            return;
        }
        notified.await;
    }
}

// Far enough out to never fire during a run
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// The instant `after` from now, saturating to a far-future instant
///
/// Timeouts come straight from configuration, so values like `u64::MAX`
/// seconds mean "no limit" rather than an overflow.
pub fn deadline_after(after: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(after)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Throughput helper shared by the monitor and the final summary
pub fn rate(total: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        total as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_increment_is_monotonic() {
        let progress = Progress::new(10);
        assert_eq!(progress.total(), 0);
        assert_eq!(progress.increment(), 1);
        assert_eq!(progress.increment(), 2);
        assert_eq!(progress.total(), 2);
        assert!(!progress.is_capped());
    }

    #[test]
    fn test_capped_at_limit() {
        let progress = Progress::new(2);
        progress.increment();
        progress.increment();
        assert!(progress.is_capped());
    }

    #[test]
    fn test_rate_with_zero_elapsed() {
        assert_eq!(rate(10, Duration::ZERO), 0.0);
        assert_eq!(rate(10, Duration::from_secs(5)), 2.0);
    }

    #[test]
    fn test_deadline_after() {
        let before = Instant::now();
        let deadline = deadline_after(Duration::from_secs(10));
        assert!(deadline >= before + Duration::from_secs(10));
    }

    #[test]
    fn test_deadline_after_huge_timeout_saturates() {
        let deadline = deadline_after(Duration::from_secs(u64::MAX));
        assert!(deadline > Instant::now() + Duration::from_secs(365 * 24 * 60 * 60));
    }

    #[tokio::test]
    async fn test_wait_for_cap_wakes_after_increment() {
        let progress = Arc::new(Progress::new(3));

        let waiter = {
            let progress = Arc::clone(&progress);
            tokio::spawn(async move { progress.wait_for_cap().await })
        };

        for _ in 0..3 {
            progress.increment();
        }

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake once the cap is reached")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_cap_wakes_every_waiter() {
        let progress = Arc::new(Progress::new(1));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let progress = Arc::clone(&progress);
                tokio::spawn(async move { progress.wait_for_cap().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        progress.increment();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("every waiter should wake")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_wait_for_cap_when_already_capped() {
        let progress = Progress::new(1);
        progress.increment();
        tokio::time::timeout(Duration::from_millis(100), progress.wait_for_cap())
            .await
            .expect("already capped should return immediately");
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_counted() {
        let progress = Arc::new(Progress::new(u64::MAX));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let progress = Arc::clone(&progress);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    progress.increment();
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(progress.total(), 800);
    }
}

//! Frontier: the bounded FIFO of pending URLs plus the set of every URL ever admitted
//!
//! The frontier is deliberately lossy. Producers never wait on a full queue;
//! a URL that arrives while the queue is at capacity is dropped and counted.
//! Since it was already admitted it is never offered again this run. This
//! trades coverage for liveness: with many workers all pushing, a blocking
//! push could leave every worker waiting on a queue nobody is draining.
//!
//! Every URL handed out by [`Frontier::pop`] stays in flight until its
//! [`Lease`] is dropped. When the queue is empty and nothing is in flight no
//! new work can appear, so the frontier closes itself and every parked `pop`
//! returns [`Popped::Closed`].

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// Result of waiting on the frontier
#[derive(Debug)]
pub enum Popped<'a> {
    /// A URL to process; dropping the lease marks it finished
    Url(Lease<'a>),
    /// The queue is closed and drained
    Closed,
}

/// A URL checked out of the frontier
///
/// Children discovered while the lease is held are pushed before the lease
/// is released, which is what keeps the exhaustion check sound.
#[derive(Debug)]
pub struct Lease<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl Lease<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.frontier.release();
    }
}

#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<String>,
    in_flight: usize,
    closed: bool,
}

/// Bounded, deduplicating, closable work queue shared by all workers
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<QueueState>,
    seen: Mutex<HashSet<String>>,
    capacity: usize,
    dropped: AtomicU64,
    available: Notify,
}

impl Frontier {
    /// Creates an empty frontier holding at most `capacity` pending URLs
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            seen: Mutex::new(HashSet::new()),
            capacity,
            dropped: AtomicU64::new(0),
            available: Notify::new(),
        }
    }

    /// Marks `url` as seen for the rest of the run
    ///
    /// Returns true only for the first caller to admit this URL; the
    /// membership test and the insert happen under one lock.
    pub fn admit(&self, url: &str) -> bool {
        lock(&self.seen).insert(url.to_string())
    }

    /// Places `url` at the back of the queue without waiting
    ///
    /// Returns false when the queue is full (the URL is dropped and counted)
    /// or closed.
    pub fn try_push(&self, url: String) -> bool {
        {
            let mut state = lock(&self.state);
            if state.closed {
                return false;
            }
            if state.queue.len() >= self.capacity {
                drop(state);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Frontier full, dropped {}", url);
                return false;
            }
            state.queue.push_back(url);
        }
        self.available.notify_one();
        true
    }

    /// Admits then enqueues `url`
    ///
    /// Returns true if the URL was new and landed in the queue.
    pub fn offer(&self, url: &str) -> bool {
        self.admit(url) && self.try_push(url.to_string())
    }

    /// Waits for the next URL
    ///
    /// Items already queued are still delivered after [`Frontier::close`];
    /// once the queue is closed and empty this returns `Closed` immediately.
    pub async fn pop(&self) -> Popped<'_> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before inspecting the queue so a push or close between
            // the check and the await is not missed.
            notified.as_mut().enable();

            {
                let mut state = lock(&self.state);
                if let Some(url) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Popped::Url(Lease {
                        frontier: self,
                        url,
                    });
                }

                if state.closed {
                    return Popped::Closed;
                }

                if state.in_flight == 0 {
                    state.closed = true;
                    drop(state);
                    tracing::debug!("Frontier exhausted, closing");
                    self.available.notify_waiters();
                    return Popped::Closed;
                }
            }

            notified.await;
        }
    }

    /// Marks the frontier closed and wakes every parked `pop`
    pub fn close(&self) {
        lock(&self.state).closed = true;
        self.available.notify_waiters();
    }

    fn release(&self) {
        let exhausted = {
            let mut state = lock(&self.state);
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 && state.queue.is_empty() && !state.closed {
                state.closed = true;
                true
            } else {
                false
            }
        };

        if exhausted {
            tracing::debug!("Frontier exhausted, closing");
            self.available.notify_waiters();
        }
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        lock(&self.state).queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    /// Number of distinct URLs ever admitted
    pub fn seen_count(&self) -> usize {
        lock(&self.seen).len()
    }

    /// Number of admitted URLs lost to a full queue
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// A panic while holding one of these locks cannot leave the queue or the
// seen set half-updated, so a poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

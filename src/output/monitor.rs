//! Periodic throughput reporting
//!
//! The monitor is purely observational: it reads the progress counter and
//! the frontier on a fixed interval and emits one status line per tick.

use crate::crawler::Frontier;
use crate::state::{deadline_after, Progress};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

/// Handle to a running monitor task
pub struct MonitorHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops the monitor and waits for its task to finish
    pub async fn stop(self) {
        // The task may already have exited on its own after the cap
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::warn!("Monitor task failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the monitor on the current runtime
///
/// The first line is emitted one full `every` after start. The task exits
/// when the cap is reached or when [`MonitorHandle::stop`] is called.
pub fn spawn_monitor(
    progress: Arc<Progress>,
    frontier: Arc<Frontier>,
    every: Duration,
) -> MonitorHandle {
    let (stop, mut stopped) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(deadline_after(every), every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => report(&progress, &frontier),
                _ = progress.wait_for_cap() => {
                    report(&progress, &frontier);
                    tracing::info!("Record cap of {} reached", progress.cap());
                    break;
                }
                _ = &mut stopped => break,
            }
        }
    });

    MonitorHandle { stop, task }
}

fn report(progress: &Progress, frontier: &Frontier) {
    tracing::info!(
        "Crawled {} records in {:.0}s ({:.1}/s), {} queued, {} dropped",
        progress.total(),
        progress.elapsed().as_secs_f64(),
        progress.rate(),
        frontier.len(),
        frontier.dropped()
    );
}

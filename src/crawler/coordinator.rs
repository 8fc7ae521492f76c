//! Crawler coordinator - run lifecycle and stop conditions
//!
//! A run moves through `Init -> Seeding -> Running -> Draining -> Done`:
//! - Init opens storage, opens a run record and builds the shared state
//! - Seeding offers every configured seed to the frontier
//! - Running spawns the workers and the monitor, then waits for the first of
//!   frontier exhaustion, the record cap, or the run deadline
//! - Draining closes the frontier, stops the monitor and joins every worker
//! - Done closes the run record and returns the summary

use crate::config::Config;
use crate::crawler::classify::Classifier;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::sink::Sink;
use crate::crawler::worker::{Worker, WorkerReport};
use crate::output::spawn_monitor;
use crate::state::{deadline_after, rate, Progress};
use crate::storage::{open_storage, Storage};
use crate::url::{normalize_url, SiteScope};
use crate::LanternError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Seeding,
    Running,
    Draining,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::Seeding => "seeding",
            RunPhase::Running => "running",
            RunPhase::Draining => "draining",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Which stop condition ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Nothing left to crawl
    Exhausted,
    /// The record cap was reached
    CapReached,
    /// The run deadline elapsed
    TimedOut,
}

impl StopReason {
    /// Value stored in the run ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Exhausted => "finished",
            StopReason::CapReached => "capped",
            StopReason::TimedOut => "timeout",
        }
    }

    /// Prefix of the final report line
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::Exhausted => "FINISHED",
            StopReason::CapReached => "CAPPED",
            StopReason::TimedOut => "TIMEOUT",
        }
    }
}

/// Final report of a run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub run_id: i64,
    pub total: u64,
    pub elapsed: Duration,
    pub rate: f64,
    pub stop_reason: StopReason,
    pub dropped: u64,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} records in {:.2}s ({:.2}/s)",
            self.stop_reason.label(),
            self.total,
            self.elapsed.as_secs_f64(),
            self.rate
        )
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    storage: Option<Arc<dyn Storage>>,
}

impl Coordinator {
    /// Creates a coordinator that opens the configured database at Init
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `config_hash` - Hash of the config file, recorded with the run
    pub fn new(config: Config, config_hash: impl Into<String>) -> Self {
        Self {
            config,
            config_hash: config_hash.into(),
            storage: None,
        }
    }

    /// Creates a coordinator over an already opened storage backend
    pub fn with_storage(
        config: Config,
        config_hash: impl Into<String>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            config_hash: config_hash.into(),
            storage: Some(storage),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Only storage initialization and client setup can fail; once workers
    /// start, every per-URL failure is absorbed and the run always reaches
    /// Done.
    pub async fn run(self) -> Result<CrawlSummary, LanternError> {
        let Coordinator {
            config,
            config_hash,
            storage,
        } = self;
        let crawler = &config.crawler;

        // ===== Init =====
        enter(RunPhase::Init);

        let storage: Arc<dyn Storage> = match storage {
            Some(storage) => storage,
            None => Arc::new(open_storage(Path::new(&config.output.database_path))?),
        };

        let scope = SiteScope::new(&config.site.base_url, &config.site.article_prefix)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(crawler.request_timeout_secs),
        )?;
        let extractor = Arc::new(Extractor::new(
            client,
            scope,
            Classifier::from_config(&config.classifier),
            config.site.title_suffix.clone(),
        ));

        // Opened last so a failed setup leaves no unfinished run behind
        let run_id = storage.create_run(&config_hash)?;

        let frontier = Arc::new(Frontier::new(crawler.queue_capacity));
        let progress = Arc::new(Progress::new(crawler.max_records));
        let deadline = deadline_after(Duration::from_secs(crawler.run_timeout_secs));

        tracing::info!(
            "Run {} on {} with {} workers, cap {}, timeout {}s",
            run_id,
            config.site.base_url,
            crawler.workers,
            crawler.max_records,
            crawler.run_timeout_secs
        );

        // ===== Seeding =====
        enter(RunPhase::Seeding);

        let mut seeded = 0;
        for seed in &config.site.seeds {
            match normalize_url(seed) {
                Ok(url) => {
                    if frontier.offer(url.as_str()) {
                        seeded += 1;
                    }
                }
                Err(e) => tracing::warn!("Skipping seed {}: {}", seed, e),
            }
        }
        tracing::info!("Seeded frontier with {} URLs", seeded);

        // ===== Running =====
        enter(RunPhase::Running);

        let monitor = spawn_monitor(
            Arc::clone(&progress),
            Arc::clone(&frontier),
            Duration::from_secs(crawler.monitor_interval_secs),
        );

        let mut workers = JoinSet::new();
        for id in 0..crawler.workers {
            let worker = Worker::new(
                id,
                Arc::clone(&frontier),
                Arc::clone(&extractor),
                Sink::new(Arc::clone(&storage), Arc::clone(&progress)),
                deadline,
            );
            workers.spawn(worker.run());
        }

        let mut reports = Vec::with_capacity(crawler.workers);
        let waited = tokio::select! {
            biased;
            _ = progress.wait_for_cap() => StopReason::CapReached,
            _ = tokio::time::sleep_until(deadline) => StopReason::TimedOut,
            _ = join_workers(&mut workers, &mut reports) => StopReason::Exhausted,
        };

        // Workers also exit on their own when they observe the cap or the
        // deadline, so an emptied join set does not by itself mean exhaustion.
        let stop_reason = match waited {
            StopReason::Exhausted if progress.is_capped() => StopReason::CapReached,
            StopReason::Exhausted if Instant::now() >= deadline => StopReason::TimedOut,
            other => other,
        };

        // ===== Draining =====
        enter(RunPhase::Draining);

        frontier.close();
        monitor.stop().await;
        join_workers(&mut workers, &mut reports).await;

        // ===== Done =====
        enter(RunPhase::Done);

        let total = progress.total();
        let elapsed = progress.elapsed();
        let processed: u64 = reports.iter().map(|r| r.processed).sum();

        if let Err(e) = storage.finish_run(run_id, total, stop_reason.as_str()) {
            tracing::error!("Failed to close run {}: {}", run_id, e);
        }

        tracing::info!(
            "Run {} stopped ({}): {} records from {} pages fetched, {} URLs seen, {} dropped",
            run_id,
            stop_reason.as_str(),
            total,
            processed,
            frontier.seen_count(),
            frontier.dropped()
        );

        Ok(CrawlSummary {
            run_id,
            total,
            elapsed,
            rate: rate(total, elapsed),
            stop_reason,
            dropped: frontier.dropped(),
        })
    }
}

fn enter(phase: RunPhase) {
    tracing::info!("Phase: {}", phase);
}

/// Joins every remaining worker, collecting reports
///
/// A panicked worker is logged and skipped; it cannot corrupt the shared
/// state beyond the record it was processing.
async fn join_workers(workers: &mut JoinSet<WorkerReport>, reports: &mut Vec<WorkerReport>) {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => tracing::error!("Worker task failed: {}", e),
        }
    }
}

/// Runs a crawl with storage opened from the config
///
/// # Example
///
/// ```no_run
/// use lantern_crawl::config::load_config_with_hash;
/// use lantern_crawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("lantern.toml"))?;
/// let summary = run_crawl(config, hash).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: String) -> Result<CrawlSummary, LanternError> {
    Coordinator::new(config, config_hash).run().await
}

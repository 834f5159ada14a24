//! Periodic sync driver
//!
//! A ticker task feeds a bounded channel of capacity one; a single consumer
//! runs one sync per received tick. While a sync is running at most one tick
//! waits in the channel and any further tick is dropped, so two syncs never
//! overlap and a slow sync does not build up a backlog.

use crate::error::SyncError;
use crate::sync::{FileSystem, SyncReport, Synchronizer};
use clap::ValueEnum;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Unit for the sync period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_secs(self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 60 * 60,
            TimeUnit::Days => 24 * 60 * 60,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "seconds"),
            TimeUnit::Minutes => write!(f, "minutes"),
            TimeUnit::Hours => write!(f, "hours"),
            TimeUnit::Days => write!(f, "days"),
        }
    }
}

/// How often a sync runs: every `frequency` `unit`s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    frequency: u64,
    unit: TimeUnit,
}

impl Schedule {
    pub fn new(frequency: u64, unit: TimeUnit) -> Self {
        Self { frequency, unit }
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.frequency.saturating_mul(self.unit.as_secs()))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} {}", self.frequency, self.unit)
    }
}

/// Counters collected while the scheduler runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub completed_runs: u64,
    pub failed_runs: u64,
    pub operation_errors: u64,
}

type SyncJob = dyn Fn() -> Result<SyncReport, SyncError> + Send + Sync;

/// Runs a sync job at a fixed period with queue-depth-one overlap handling
pub struct Scheduler {
    period: Duration,
    job: Arc<SyncJob>,
    stats: Arc<Mutex<SchedulerStats>>,
}

impl Scheduler {
    pub fn new<J>(period: Duration, job: J) -> Self
    where
        J: Fn() -> Result<SyncReport, SyncError> + Send + Sync + 'static,
    {
        Self {
            period,
            job: Arc::new(job),
            stats: Arc::new(Mutex::new(SchedulerStats::default())),
        }
    }

    /// Schedule `synchronizer.sync()` according to `schedule`
    pub fn for_synchronizer<F>(synchronizer: Synchronizer<F>, schedule: Schedule) -> Self
    where
        F: FileSystem + Send + Sync + 'static,
    {
        let synchronizer = Arc::new(synchronizer);
        Self::new(schedule.period(), move || synchronizer.sync())
    }

    pub fn stats(&self) -> SchedulerStats {
        *self.stats.lock()
    }

    /// Run until `shutdown` resolves
    ///
    /// The first sync starts immediately. A sync already in progress when
    /// `shutdown` resolves is allowed to finish.
    pub async fn run_until<S>(&self, shutdown: S) -> SchedulerStats
    where
        S: Future<Output = ()>,
    {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let ticker = tokio::spawn(tick_loop(self.period, tx, Arc::clone(&self.stats)));
        info!(period_secs = self.period.as_secs_f64(), "Scheduler started");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                }
                tick = rx.recv() => {
                    if tick.is_none() {
                        break;
                    }
                    self.run_once().await;
                }
            }
        }

        ticker.abort();
        self.stats()
    }

    async fn run_once(&self) {
        let job = Arc::clone(&self.job);
        let outcome = tokio::task::spawn_blocking(move || job())
            .await
            .map_err(|e| SyncError::Task(e.to_string()))
            .and_then(|result| result);

        let mut stats = self.stats.lock();
        match outcome {
            Ok(report) => {
                stats.completed_runs += 1;
                stats.operation_errors += report.errors.len() as u64;
                if report.has_errors() {
                    warn!(
                        failed = report.errors.len(),
                        "Sync completed with failed operations"
                    );
                }
            }
            Err(e) => {
                stats.failed_runs += 1;
                error!("Sync failed: {}", e);
            }
        }
    }
}

async fn tick_loop(period: Duration, tx: mpsc::Sender<()>, stats: Arc<Mutex<SchedulerStats>>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        stats.lock().ticks += 1;
        match tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                stats.lock().skipped_ticks += 1;
                warn!("Sync still running, skipping tick");
            }
            Err(TrySendError::Closed(())) => break,
        }
    }
}

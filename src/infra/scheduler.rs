use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::use_cases::expiration::ExpirationUseCases;

/// Name of the daily job that runs the expiration sweep.
pub const DAILY_EVENT: &str = "mywebhook_daily_event";

/// Work fired by the scheduler on every tick.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn fire(&self);
}

#[async_trait]
impl ScheduledJob for ExpirationUseCases {
    async fn fire(&self) {
        if let Err(e) = self.run().await {
            error!(error = ?e, "Expiration sweep failed");
        }
    }
}

struct ScheduledEntry {
    next_run: Arc<Mutex<DateTime<Utc>>>,
    handle: JoinHandle<()>,
}

/// In-process registry of named recurring jobs, one tokio task per job.
#[derive(Default)]
pub struct Scheduler {
    jobs: Mutex<HashMap<String, ScheduledEntry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the named job fires next, or `None` if it is not scheduled.
    pub fn next_scheduled(&self, name: &str) -> Option<DateTime<Utc>> {
        self.lock_jobs()
            .get(name)
            .map(|entry| *entry.next_run.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Schedules `job` every `every`, first run immediately.
    /// Returns `false` without touching anything if `name` is already scheduled.
    pub fn schedule(&self, name: &str, every: Duration, job: Arc<dyn ScheduledJob>) -> bool {
        let mut jobs = self.lock_jobs();
        if jobs.contains_key(name) {
            return false;
        }

        let next_run = Arc::new(Mutex::new(Utc::now()));
        let task_next_run = next_run.clone();
        let job_name = name.to_string();
        let step = chrono::Duration::from_std(every).unwrap_or(chrono::Duration::days(1));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                *task_next_run.lock().unwrap_or_else(PoisonError::into_inner) = Utc::now() + step;
                info!(job = %job_name, "Running scheduled job");
                job.fire().await;
            }
        });

        jobs.insert(name.to_string(), ScheduledEntry { next_run, handle });
        info!(job = %name, every_secs = every.as_secs(), "Scheduled job");
        true
    }

    /// Cancels the named job. Returns `false` if nothing was scheduled.
    pub fn unschedule(&self, name: &str) -> bool {
        match self.lock_jobs().remove(name) {
            Some(entry) => {
                entry.handle.abort();
                info!(job = %name, "Unscheduled job");
                true
            }
            None => false,
        }
    }

    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<String, ScheduledEntry>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for entry in self.lock_jobs().values() {
            entry.handle.abort();
        }
    }
}

/// Registers the daily expiration sweep unless it is already scheduled.
pub fn schedule_daily_sweep(
    scheduler: &Scheduler,
    sweeper: Arc<ExpirationUseCases>,
    every: Duration,
) -> bool {
    if scheduler.next_scheduled(DAILY_EVENT).is_some() {
        return false;
    }
    scheduler.schedule(DAILY_EVENT, every, sweeper)
}

/// Cancels the daily expiration sweep if one is pending.
pub fn unschedule_daily_sweep(scheduler: &Scheduler) -> bool {
    scheduler.unschedule(DAILY_EVENT)
}

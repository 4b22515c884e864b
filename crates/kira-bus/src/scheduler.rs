// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scheduler (C7): single-shot and periodic jobs running on worker
//! threads, with cancellation. Grounded on `oj-engine::scheduler::Scheduler`'s
//! timer-table shape, adapted from "poll a table of deadlines" (the
//! engine's single-threaded event loop has no async runtime of its own)
//! to "one `tokio::spawn`ed task per job", since Kira's worker model is
//! parallel worker threads rather than one engine loop.

use kira_core::id::{IdGen, ScheduledJobId, UuidIdGen};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A scheduled job closure: receives a [`CancellationToken`] it should poll
/// during long-running work, since `cancel` does not abort an in-flight
/// tick.
pub type Job = Arc<dyn Fn(CancellationToken) -> BoxFuture + Send + Sync>;

/// Cooperative cancellation signal passed into a running job closure.
#[derive(Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct JobHandle {
    cancelled: Arc<AtomicBool>,
}

/// Schedules one-shot and periodic jobs on a Tokio runtime handle.
///
/// Periodic jobs skip a tick if the previous tick's job hasn't returned
/// yet, rather than running concurrently for the same job id (see
/// DESIGN.md's overlap-skip decision).
pub struct Scheduler {
    handle: tokio::runtime::Handle,
    jobs: Arc<Mutex<HashMap<ScheduledJobId, JobHandle>>>,
    id_gen: UuidIdGen,
}

impl Scheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            id_gen: UuidIdGen,
        }
    }

    /// Runs `job` once after `delay`. Cancelling before the delay elapses
    /// prevents it from running at all.
    pub fn schedule_once(&self, delay: Duration, job: Job) -> ScheduledJobId {
        let id = ScheduledJobId::generate(&self.id_gen);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.jobs.lock().insert(
            id.clone(),
            JobHandle {
                cancelled: cancelled.clone(),
            },
        );

        let jobs = self.jobs.clone();
        let job_id = id.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !cancelled.load(Ordering::SeqCst) {
                job(CancellationToken(cancelled.clone())).await;
            }
            jobs.lock().remove(&job_id);
        });

        id
    }

    /// Runs `job` every `interval` until cancelled. If a tick's job hasn't
    /// returned by the time the next tick is due, that tick is skipped
    /// rather than run concurrently.
    pub fn schedule_periodic(&self, interval: Duration, job: Job) -> ScheduledJobId {
        let id = ScheduledJobId::generate(&self.id_gen);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.jobs.lock().insert(
            id.clone(),
            JobHandle {
                cancelled: cancelled.clone(),
            },
        );

        let handle = self.handle.clone();
        let in_flight = Arc::new(AtomicBool::new(false));
        self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; consume it
            loop {
                ticker.tick().await;
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                if in_flight.swap(true, Ordering::SeqCst) {
                    tracing::warn!("scheduler skipped overlapping periodic tick");
                    continue;
                }
                let job = job.clone();
                let in_flight = in_flight.clone();
                let token = CancellationToken(cancelled.clone());
                handle.spawn(async move {
                    job(token).await;
                    in_flight.store(false, Ordering::SeqCst);
                });
            }
        });

        id
    }

    /// Cancels a pending or running job. Returns `true` if `job_id` was
    /// known. Does not interrupt a tick already in flight; the running
    /// closure must observe its [`CancellationToken`] itself.
    pub fn cancel(&self, job_id: &ScheduledJobId) -> bool {
        match self.jobs.lock().remove(job_id) {
            Some(handle) => {
                handle.cancelled.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub fn has_job(&self, job_id: &ScheduledJobId) -> bool {
        self.jobs.lock().contains_key(job_id)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

//! Worker pool with managed blocking
//!
//! Worker threads wait on a shared job queue guarded by a mutex and a
//! condition variable. Shutdown is immediate: queued jobs are dropped and
//! workers exit after their current job. The pool never waits for its
//! threads.
//!
//! A job that waits on work queued behind it (a producer pulling a nested
//! merge) runs that wait inside `block_on`. While any worker is blocked
//! the pool keeps `threads` unblocked workers by starting extra ones;
//! extras retire after `KEEP_ALIVE` without work.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ExecutorError, ExecutorResult};

/// Unit of work run on a worker thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

const KEEP_ALIVE: Duration = Duration::from_millis(500);

#[derive(Default)]
struct PoolState {
    jobs: VecDeque<Job>,
    workers: usize,
    idle: usize,
    blocked: usize,
    spawned: usize,
}

impl PoolState {
    /// Workers that can pick up a job soon
    fn unblocked(&self) -> usize {
        self.workers.saturating_sub(self.blocked)
    }
}

struct PoolShared {
    state: Mutex<PoolState>,
    available: Condvar,
    shutdown: AtomicBool,
    core: usize,
    name: String,
}

impl PoolShared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

/// Start one more worker; the caller holds the state lock
fn spawn_worker(shared: &Arc<PoolShared>, state: &mut PoolState) -> std::io::Result<()> {
    let worker_shared = Arc::clone(shared);
    thread::Builder::new()
        .name(format!("{}-{}", shared.name, state.spawned))
        .spawn(move || worker_loop(worker_shared))?;
    state.spawned += 1;
    state.workers += 1;
    Ok(())
}

/// Compensate for blocked workers when queued jobs would otherwise starve
fn compensate(shared: &Arc<PoolShared>, state: &mut PoolState) {
    if shared.is_shutdown() || state.jobs.is_empty() || state.idle > 0 {
        return;
    }
    if state.blocked == 0 || state.unblocked() >= shared.core {
        return;
    }
    match spawn_worker(shared, state) {
        Ok(()) => log_event_with_fields(
            Event::PoolGrowth,
            &[("blocked", &state.blocked.to_string()), ("workers", &state.workers.to_string())],
        ),
        Err(err) => log_event_with_fields(
            Event::PoolGrowth,
            &[("blocked", &state.blocked.to_string()), ("error", &err.to_string())],
        ),
    }
}

/// Worker pool running producer tasks
pub struct WorkerPool {
    shared: Arc<PoolShared>,
}

impl WorkerPool {
    /// Start `threads` workers named `{name}-{index}`
    pub fn new(threads: usize, name: &str) -> ExecutorResult<Self> {
        if threads == 0 {
            return Err(ExecutorError::InvalidThreadCount(threads));
        }
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState::default()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
            core: threads,
            name: name.to_string(),
        });

        {
            let mut state = shared.lock();
            for _ in 0..threads {
                if let Err(err) = spawn_worker(&shared, &mut state) {
                    // Stop the workers already started before reporting.
                    shared.shutdown.store(true, Ordering::Release);
                    shared.available.notify_all();
                    return Err(ExecutorError::WorkerSpawn(err));
                }
            }
        }

        Ok(Self { shared })
    }

    /// Number of workers kept unblocked
    pub fn threads(&self) -> usize {
        self.shared.core
    }

    /// Workers currently alive, including compensating ones
    pub fn workers(&self) -> usize {
        self.shared.lock().workers
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.is_shutdown()
    }

    /// Queue a job; a shut-down pool hands the job back
    pub fn submit(&self, job: Job) -> Result<(), Job> {
        let mut state = self.shared.lock();
        if self.is_shutdown() {
            return Err(job);
        }
        state.jobs.push_back(job);
        compensate(&self.shared, &mut state);
        drop(state);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Run `wait` as a blocking section of the current job. Queued jobs
    /// get a compensating worker if every unblocked worker is taken.
    pub fn block_on<T>(&self, wait: impl FnOnce() -> T) -> T {
        struct Blocked<'a>(&'a PoolShared);

        impl Drop for Blocked<'_> {
            fn drop(&mut self) {
                self.0.lock().blocked -= 1;
            }
        }

        {
            let mut state = self.shared.lock();
            state.blocked += 1;
            compensate(&self.shared, &mut state);
        }
        let _blocked = Blocked(&self.shared);
        wait()
    }

    /// Stop accepting jobs, drop the queued ones and wake every worker.
    /// Returns the number of dropped jobs.
    pub fn shutdown_now(&self) -> usize {
        let mut state = self.shared.lock();
        self.shared.shutdown.store(true, Ordering::Release);
        let dropped = state.jobs.len();
        state.jobs.clear();
        drop(state);
        self.shared.available.notify_all();
        dropped
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}

/// Readable text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let job = {
            let mut state = shared.lock();
            loop {
                if shared.is_shutdown() {
                    state.workers -= 1;
                    return;
                }
                if let Some(job) = state.jobs.pop_front() {
                    break job;
                }
                state.idle += 1;
                let (guard, timeout) = shared
                    .available
                    .wait_timeout(state, KEEP_ALIVE)
                    .unwrap_or_else(|e| e.into_inner());
                state = guard;
                state.idle -= 1;
                if timeout.timed_out() && state.jobs.is_empty() && state.unblocked() > shared.core {
                    state.workers -= 1;
                    return;
                }
            }
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            let msg = panic_message(&*payload);
            let worker = thread::current().name().unwrap_or("worker").to_string();
            log_event_with_fields(Event::WorkerPanic, &[("worker", &worker), ("panic", &msg)]);
        }
    }
}

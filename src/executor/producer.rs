//! Producer tasks of the buffered executor
//!
//! One task per child stream. A run pulls from the child while it holds
//! credits, sending one message per solution to the shared queue. The
//! consumer returns a credit for every solution it takes; when the free
//! credits climb back to the reschedule threshold the task is queued on the
//! pool again. A task therefore never has more than `buffer_size`
//! unconsumed solutions in flight.
//!
//! # Shared state
//!
//! - `credits`: free credits, atomic, decremented by compare-and-swap
//! - `active`: "scheduled or running", under `state`
//! - `running`: a worker is inside `run`; paired with `idle` so that
//!   `close` can wait for that run to finish. A run still queued on the
//!   pool is not waited for: it sees `closed` and returns at once.
//! - `closed` / `exhausted`: monotonic flags
//!
//! The child itself sits behind its own mutex. Whoever takes it out of the
//! `Option` closes it, so it is closed exactly once. A pull that panics is
//! a producer fault like any failed pull.
//!
//! Pulling an asynchronous child (a nested merge) waits on tasks queued on
//! the same pool, so that wait runs under `WorkerPool::block_on`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, TryLockError, Weak};
use std::thread;

use crate::observability::{log_event_with_fields, Event, ExecutorMetrics};
use crate::results::{BoxedResults, Results, ResultsError, ResultsResult};
use crate::solution::Solution;

use super::executor::FaultPolicy;
use super::pool::{panic_message, WorkerPool};
use super::queue::{Message, MessageQueue};

#[derive(Debug, Default)]
struct TaskState {
    active: bool,
    running: bool,
}

/// Leaves `running` (and, when unwinding, `active`) cleared on every exit
/// from `run`
struct RunGuard<'a> {
    task: &'a ProducerTask,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.task.mark_exhausted();
        }
        let mut state = self.task.lock_state();
        state.running = false;
        if thread::panicking() {
            state.active = false;
        }
        self.task.idle.notify_all();
    }
}

pub(crate) struct ProducerTask {
    id: usize,
    child: Mutex<Option<BoxedResults>>,
    credits: AtomicUsize,
    threshold: usize,
    state: Mutex<TaskState>,
    idle: Condvar,
    closed: AtomicBool,
    exhausted: AtomicBool,
    queue: Arc<MessageQueue>,
    policy: FaultPolicy,
    metrics: Arc<ExecutorMetrics>,
}

impl ProducerTask {
    pub(crate) fn new(
        id: usize,
        child: BoxedResults,
        buffer_size: usize,
        queue: Arc<MessageQueue>,
        policy: FaultPolicy,
        metrics: Arc<ExecutorMetrics>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            child: Mutex::new(Some(child)),
            credits: AtomicUsize::new(buffer_size),
            threshold: (buffer_size / 2).max(1),
            state: Mutex::new(TaskState::default()),
            idle: Condvar::new(),
            closed: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
            queue,
            policy,
            metrics,
        })
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn free_credits(&self) -> usize {
        self.credits.load(Ordering::Acquire)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock_state(&self) -> MutexGuard<'_, TaskState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_child(&self) -> MutexGuard<'_, Option<BoxedResults>> {
        self.child.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn should_stop(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.exhausted.load(Ordering::Acquire)
    }

    fn try_take_credit(&self) -> bool {
        let mut current = self.credits.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return false;
            }
            match self.credits.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Return one credit after the consumer took a solution of this task.
    /// Reschedules when the free credits reach the threshold.
    pub(crate) fn return_credit(self: &Arc<Self>, pool: &Arc<WorkerPool>) {
        if self.is_closed() {
            return;
        }
        let free = self.credits.fetch_add(1, Ordering::AcqRel) + 1;
        if free == self.threshold {
            self.schedule(pool);
        }
    }

    /// Queue a run on the pool unless one is already scheduled or running.
    /// A rejected submission force-closes the task.
    pub(crate) fn schedule(self: &Arc<Self>, pool: &Arc<WorkerPool>) -> bool {
        {
            let mut state = self.lock_state();
            if state.active || self.should_stop() {
                return false;
            }
            state.active = true;
        }

        let task = Arc::clone(self);
        let weak: Weak<WorkerPool> = Arc::downgrade(pool);
        match pool.submit(Box::new(move || {
            let pool = weak.upgrade();
            task.run(pool.as_deref());
        })) {
            Ok(()) => {
                self.metrics.increment_tasks_scheduled();
                true
            }
            Err(_rejected) => {
                self.metrics.increment_submissions_rejected();
                log_event_with_fields(Event::PoolRejected, &[("producer", &self.id.to_string())]);
                if let Err(err) = self.close(true) {
                    log_event_with_fields(
                        Event::CloseFailed,
                        &[("producer", &self.id.to_string()), ("error", &err.to_string())],
                    );
                }
                false
            }
        }
    }

    /// Body of one scheduled run
    fn run(&self, pool: Option<&WorkerPool>) {
        {
            let mut state = self.lock_state();
            if self.is_closed() {
                // Closed while queued; `close` already released the child.
                state.active = false;
                self.idle.notify_all();
                return;
            }
            state.running = true;
        }
        let _guard = RunGuard { task: self };

        loop {
            while !self.should_stop() && self.try_take_credit() {
                if !self.pull_one(pool) {
                    break;
                }
            }

            let mut state = self.lock_state();
            if !self.should_stop() && self.free_credits() >= self.threshold {
                // Credits came back while this run was finishing; a schedule
                // call in that window saw `active` and did nothing.
                continue;
            }
            state.active = false;
            break;
        }

        if self.is_closed() {
            self.close_child_logged();
        }
    }

    /// Pull one solution from the child. Returns false when the task must
    /// stop pulling.
    fn pull_one(&self, pool: Option<&WorkerPool>) -> bool {
        let mut child = self.lock_child();
        let Some(results) = child.as_mut() else {
            return false;
        };

        let outcome = match pool {
            Some(pool) if results.waits_on_producers() => pool.block_on(|| pull_guarded(results)),
            _ => pull_guarded(results),
        };
        drop(child);

        match outcome {
            Ok(Some(solution)) => {
                self.queue.push(Message::Item {
                    producer: self.id,
                    solution,
                });
                true
            }
            Ok(None) => {
                self.mark_exhausted();
                false
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    fn mark_exhausted(&self) {
        if !self.exhausted.swap(true, Ordering::AcqRel) {
            self.metrics.increment_producers_exhausted();
            self.queue.push(Message::Exhausted { producer: self.id });
        }
    }

    fn fail(&self, err: ResultsError) {
        self.metrics.increment_producer_faults();
        log_event_with_fields(
            Event::ProducerFault,
            &[
                ("error", &err.to_string()),
                ("policy", if self.policy == FaultPolicy::Contain { "contain" } else { "propagate" }),
                ("producer", &self.id.to_string()),
            ],
        );
        match self.policy {
            FaultPolicy::Contain => self.mark_exhausted(),
            FaultPolicy::Propagate => {
                if !self.exhausted.swap(true, Ordering::AcqRel) {
                    self.queue.push(Message::Failed {
                        producer: self.id,
                        error: ResultsError::Producer {
                            producer: self.id,
                            message: err.to_string(),
                        },
                    });
                }
            }
        }
    }

    /// Stop the task and release its child
    ///
    /// Clears the free credits so no further pulls start. With
    /// `force_inactive` nothing is waited for and the child is closed only
    /// if no pull holds it (otherwise the running pull closes it on its way
    /// out). Without it, waits for a run in progress to observe the stop
    /// first. Either way ends with an exhausted message, so a consumer
    /// never waits on a closed task.
    pub(crate) fn close(&self, force_inactive: bool) -> ResultsResult<()> {
        self.closed.store(true, Ordering::Release);
        self.credits.store(0, Ordering::Release);

        {
            let mut state = self.lock_state();
            if !force_inactive {
                while state.running {
                    state = self.idle.wait(state).unwrap_or_else(|e| e.into_inner());
                }
            }
            state.active = false;
            self.idle.notify_all();
        }

        self.mark_exhausted();

        let child = if force_inactive {
            match self.child.try_lock() {
                Ok(mut guard) => guard.take(),
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
                Err(TryLockError::WouldBlock) => None,
            }
        } else {
            self.lock_child().take()
        };

        match child {
            Some(mut results) => results.close(),
            None => Ok(()),
        }
    }

    fn close_child_logged(&self) {
        let child = self.lock_child().take();
        if let Some(mut results) = child {
            if let Err(err) = results.close() {
                log_event_with_fields(
                    Event::CloseFailed,
                    &[("producer", &self.id.to_string()), ("error", &err.to_string())],
                );
            }
        }
    }
}

/// `has_next` then `next`, with a panic reported as a source failure
fn pull_guarded(results: &mut BoxedResults) -> ResultsResult<Option<Solution>> {
    let pulled = panic::catch_unwind(AssertUnwindSafe(|| {
        if results.has_next()? {
            results.next().map(Some)
        } else {
            Ok(None)
        }
    }));
    pulled.unwrap_or_else(|payload| {
        Err(ResultsError::Source(format!(
            "child panicked: {}",
            panic_message(&*payload)
        )))
    })
}

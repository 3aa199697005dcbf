//! Buffered asynchronous fan-in
//!
//! Merges K children into one stream. Each child gets a producer task on
//! the shared worker pool; producers write tagged messages into one queue
//! and the consumer side (`BufferedResults`) reads it. Credits bound the
//! memory held per child to `buffer_size` solutions.
//!
//! No order is defined across children.
//!
//! A child may itself be a buffered merge on the same pool. Its producer
//! then blocks a worker while the inner producers still need one, which
//! the pool covers by starting another worker for the duration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crate::observability::{log_event_with_fields, Event, ExecutorMetrics, MetricsSnapshot};
use crate::results::{
    BoxedResults, CloseErrors, CollectionResults, Results, ResultsError, ResultsResult,
};
use crate::solution::{Solution, VarNames};

use super::errors::ExecutorResult;
use super::executor::{FaultPolicy, ResultsExecutor};
use super::pool::WorkerPool;
use super::producer::ProducerTask;
use super::queue::{Message, MessageQueue};

/// Consumer side of a buffered merge
pub struct BufferedResults {
    vars: VarNames,
    queue: Arc<MessageQueue>,
    tasks: Vec<Arc<ProducerTask>>,
    retired: Vec<bool>,
    live: usize,
    pending: Option<Solution>,
    pool: Arc<WorkerPool>,
    metrics: Arc<ExecutorMetrics>,
    distinct: bool,
    closed: bool,
}

impl BufferedResults {
    fn new(
        vars: VarNames,
        queue: Arc<MessageQueue>,
        tasks: Vec<Arc<ProducerTask>>,
        pool: Arc<WorkerPool>,
        metrics: Arc<ExecutorMetrics>,
        distinct: bool,
    ) -> Self {
        let live = tasks.len();
        Self {
            vars,
            queue,
            retired: vec![false; live],
            tasks,
            live,
            pending: None,
            pool,
            metrics,
            distinct,
            closed: false,
        }
    }

    /// Number of producers that have not reported exhaustion yet
    pub fn live_producers(&self) -> usize {
        self.live
    }

    fn retire(&mut self, producer: usize) {
        if let Some(retired) = self.retired.get_mut(producer) {
            if !*retired {
                *retired = true;
                self.live -= 1;
            }
        }
    }

    fn poll_pending(&mut self, deadline: Option<Instant>) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        loop {
            if self.closed || self.live == 0 {
                return Ok(false);
            }
            let timeout = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            let Some(message) = self.queue.poll(timeout) else {
                return Ok(false);
            };
            match message {
                Message::Item { producer, solution } => {
                    if let Some(task) = self.tasks.get(producer) {
                        task.return_credit(&self.pool);
                    }
                    self.metrics.increment_solutions_delivered();
                    self.pending = Some(solution);
                    return Ok(true);
                }
                Message::Exhausted { producer } => self.retire(producer),
                Message::Failed { producer, error } => {
                    self.retire(producer);
                    return Err(error);
                }
            }
        }
    }
}

impl Results for BufferedResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.poll_pending(None)
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.poll_pending(Some(Instant::now() + timeout))
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        self.pending.take().ok_or(ResultsError::EmptyStream)
    }

    fn ready_count(&self) -> usize {
        self.queue.len() + usize::from(self.pending.is_some())
    }

    fn is_async(&self) -> bool {
        true
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pending = None;

        let mut errors = CloseErrors::new();
        for task in &self.tasks {
            errors.record(task.close(false));
        }
        self.queue.clear();
        errors.into_result()
    }
}

impl Drop for BufferedResults {
    fn drop(&mut self) {
        // Stops the producers of an abandoned stream; failures were logged.
        let _ = self.close();
    }
}

/// Executor that merges children concurrently on a worker pool
pub struct BufferedResultsExecutor {
    pool: Arc<WorkerPool>,
    tasks: Mutex<Vec<Weak<ProducerTask>>>,
    closed: AtomicBool,
    policy: FaultPolicy,
    metrics: Arc<ExecutorMetrics>,
}

impl BufferedResultsExecutor {
    /// Executor with `threads` workers and contained producer faults
    pub fn new(threads: usize) -> ExecutorResult<Self> {
        Self::with_policy(threads, FaultPolicy::Contain)
    }

    pub fn with_policy(threads: usize, policy: FaultPolicy) -> ExecutorResult<Self> {
        Ok(Self {
            pool: Arc::new(WorkerPool::new(threads, "fedstream-producer")?),
            tasks: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            policy,
            metrics: Arc::new(ExecutorMetrics::new()),
        })
    }

    /// Worker count matching the available parallelism
    pub fn default_threads() -> usize {
        thread::available_parallelism().map_or(4, |n| n.get())
    }

    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }

    fn register(&self, tasks: &[Arc<ProducerTask>]) {
        let mut known = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        known.retain(|task| task.strong_count() > 0);
        known.extend(tasks.iter().map(Arc::downgrade));
    }
}

impl ResultsExecutor for BufferedResultsExecutor {
    fn merge(
        &self,
        mut children: Vec<BoxedResults>,
        var_names: VarNames,
        buffer_size: usize,
    ) -> BoxedResults {
        if self.is_closed() {
            log_event_with_fields(
                Event::ExecutorClosedMerge,
                &[("children", &children.len().to_string()), ("executor", "buffered")],
            );
            let mut errors = CloseErrors::new();
            for child in &mut children {
                errors.close(child);
            }
            let _ = errors.into_result();
            return Box::new(CollectionResults::empty(var_names));
        }
        if children.is_empty() {
            return Box::new(CollectionResults::empty(var_names));
        }
        if children.len() == 1 && children[0].is_async() {
            return children.remove(0);
        }

        self.metrics.increment_merges();
        let buffer_size = buffer_size.max(1);
        let distinct = children.len() == 1 && children[0].is_distinct();
        let queue = Arc::new(MessageQueue::new());

        let tasks: Vec<Arc<ProducerTask>> = children
            .into_iter()
            .enumerate()
            .map(|(id, child)| {
                ProducerTask::new(
                    id,
                    child,
                    buffer_size,
                    Arc::clone(&queue),
                    self.policy,
                    Arc::clone(&self.metrics),
                )
            })
            .collect();
        self.register(&tasks);

        for task in &tasks {
            task.schedule(&self.pool);
        }

        Box::new(BufferedResults::new(
            var_names,
            queue,
            tasks,
            Arc::clone(&self.pool),
            Arc::clone(&self.metrics),
            distinct,
        ))
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let dropped = self.pool.shutdown_now();
        log_event_with_fields(
            Event::ExecutorShutdown,
            &[("dropped_runs", &dropped.to_string())],
        );

        let known: Vec<Arc<ProducerTask>> = {
            let mut known = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            known.drain(..).filter_map(|task| task.upgrade()).collect()
        };
        for task in known {
            if let Err(err) = task.close(true) {
                log_event_with_fields(
                    Event::CloseFailed,
                    &[("producer", &task.id().to_string()), ("error", &err.to_string())],
                );
            }
        }
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for BufferedResultsExecutor {
    fn drop(&mut self) {
        self.close();
    }
}

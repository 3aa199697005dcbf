//! Shared producer-to-consumer message queue
//!
//! Unbounded by itself; the per-producer credits bound how many item
//! messages can be outstanding. Pushing never blocks and never drops a
//! message.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::results::ResultsError;
use crate::solution::Solution;

/// One unit of work reported by a producer, tagged with its id
#[derive(Debug)]
pub(crate) enum Message {
    /// A solution pulled from the producer's child
    Item { producer: usize, solution: Solution },
    /// The producer will send nothing more
    Exhausted { producer: usize },
    /// The producer's child failed; nothing more follows
    Failed { producer: usize, error: ResultsError },
}

impl Message {
    pub(crate) fn producer(&self) -> usize {
        match self {
            Message::Item { producer, .. }
            | Message::Exhausted { producer }
            | Message::Failed { producer, .. } => *producer,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MessageQueue {
    messages: Mutex<VecDeque<Message>>,
    available: Condvar,
}

impl MessageQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn push(&self, message: Message) {
        self.lock().push_back(message);
        self.available.notify_one();
    }

    /// Take the oldest message, waiting up to `timeout` (forever if `None`)
    pub(crate) fn poll(&self, timeout: Option<Duration>) -> Option<Message> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut messages = self.lock();
        loop {
            if let Some(message) = messages.pop_front() {
                return Some(message);
            }
            match deadline {
                None => {
                    messages = self
                        .available
                        .wait(messages)
                        .unwrap_or_else(|e| e.into_inner());
                }
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return None;
                    }
                    messages = self
                        .available
                        .wait_timeout(messages, remaining)
                        .unwrap_or_else(|e| e.into_inner())
                        .0;
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }
}

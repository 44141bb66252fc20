use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Thread-safe FIFO shared between the orchestrator and its workers.
///
/// Multi-producer, multi-consumer: each pushed item is handed to exactly one
/// consumer. Consumers block with a bounded wait and interpret a `None` from
/// [`JobQueue::pop_timeout`] as "the queue stayed empty", which is the worker
/// exit condition since all tasks are enqueued before the pool starts.
#[derive(Debug, Default)]
pub struct JobQueue<T> {
    inner: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    pub fn push(&self, item: T) {
        self.inner.lock().unwrap().push_back(item);
        self.ready.notify_one();
    }

    /// Pops the next item, waiting up to `wait` for one to arrive.
    pub fn pop_timeout(&self, wait: Duration) -> Option<T> {
        let deadline = Instant::now() + wait;
        let mut queue = self.inner.lock().unwrap();
        loop {
            if let Some(item) = queue.pop_front() {
                return Some(item);
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (guard, _) = self.ready.wait_timeout(queue, remaining).unwrap();
            queue = guard;
        }
    }

    /// Non-blocking pop, used when draining results after all workers exited.
    pub fn try_pop(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Empties the queue in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        let mut queue = self.inner.lock().unwrap();
        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

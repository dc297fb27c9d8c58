//! A fixed-size worker pool for parallel bulk index operations.
//!
//! One FIFO task queue behind a single [`Mutex`] and [`Condvar`], matching
//! the teacher's locking style elsewhere in this crate (per-tree lock, not
//! per-node). Pool size defaults to [`std::thread::available_parallelism`]
//! rather than pulling in a thread-pool crate, since the workspace's only
//! remaining dependencies are the ones the teacher already carried.

use std::collections::VecDeque;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{IndexError, IndexResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    condvar: Condvar,
    shutdown: Mutex<bool>,
}

/// A fixed-size pool of OS threads draining one shared FIFO task queue.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool sized to [`std::thread::available_parallelism`]
    /// (falling back to `1` if the platform can't report it).
    pub fn new() -> Self {
        let size = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::with_size(size)
    }

    pub fn with_size(size: usize) -> Self {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: Mutex::new(false),
        });

        let workers = (0..size)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(shared))
            })
            .collect();

        Self { shared, workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue `task` and return a [`TaskHandle`] resolving to its result.
    ///
    /// # Errors
    ///
    /// [`IndexError::PoolShutDown`] if the pool has already begun
    /// shutting down.
    pub fn enqueue<T, F>(&self, task: F) -> IndexResult<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if *self.shared.shutdown.lock().expect("shutdown mutex poisoned") {
            return Err(IndexError::PoolShutDown);
        }

        let (tx, rx) = sync_channel(1);
        let job: Job = Box::new(move || {
            let result = task();
            // The receiver may already be gone if the handle was dropped;
            // that's a legitimate cancellation-by-disinterest, not an error.
            let _ = tx.send(result);
        });

        {
            let mut queue = self.shared.queue.lock().expect("queue mutex poisoned");
            queue.push_back(job);
        }
        self.shared.condvar.notify_one();

        Ok(TaskHandle { rx })
    }

    /// Run `tasks` across the pool and collect their results in input
    /// order, blocking until every task completes.
    pub fn run_all<T, F>(&self, tasks: Vec<F>) -> IndexResult<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let handles = tasks
            .into_iter()
            .map(|task| self.enqueue(task))
            .collect::<IndexResult<Vec<_>>>()?;

        handles.into_iter().map(|h| h.join()).collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        *self.shared.shutdown.lock().expect("shutdown mutex poisoned") = true;
        self.shared.condvar.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut queue = shared.queue.lock().expect("queue mutex poisoned");
            loop {
                if let Some(job) = queue.pop_front() {
                    break Some(job);
                }
                if *shared.shutdown.lock().expect("shutdown mutex poisoned") {
                    break None;
                }
                queue = shared.condvar.wait(queue).expect("queue mutex poisoned");
            }
        };

        match job {
            Some(job) => job(),
            None => return,
        }
    }
}

/// A handle to a task enqueued on a [`WorkerPool`].
///
/// Movable but not `Clone` — exactly one caller can collect the result.
/// Dropping the handle without joining simply discards the result; the
/// task still runs to completion.
pub struct TaskHandle<T> {
    rx: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Block until the task completes and return its result.
    ///
    /// # Errors
    ///
    /// [`IndexError::TaskPanicked`] if the task panicked before sending a
    /// result.
    pub fn join(self) -> IndexResult<T> {
        self.rx.recv().map_err(|_| IndexError::TaskPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn enqueue_and_join_returns_result() {
        let pool = WorkerPool::with_size(2);
        let handle = pool.enqueue(|| 2 + 2).unwrap();
        assert_eq!(handle.join().unwrap(), 4);
    }

    #[test]
    fn run_all_preserves_input_order() {
        let pool = WorkerPool::with_size(4);
        let tasks: Vec<_> = (0..20).map(|i| move || i * i).collect();
        let results = pool.run_all(tasks).unwrap();
        assert_eq!(results, (0..20).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn many_tasks_all_execute() {
        let pool = WorkerPool::with_size(4);
        let counter = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let counter = Arc::clone(&counter);
                pool.enqueue(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn panicking_task_resolves_to_task_panicked() {
        let pool = WorkerPool::with_size(1);
        let handle: TaskHandle<()> = pool
            .enqueue(|| panic!("boom"))
            .unwrap();
        assert!(matches!(handle.join(), Err(IndexError::TaskPanicked)));
    }
}

//! Bounded fan-out of independent tasks over worker threads.
//!
//! A batch of inputs is submitted as one [`TaskGroup`]. Worker threads
//! drain a FIFO queue of `(input, slot)` pairs; each worker owns its own
//! state (for `parallel`, a child interpreter) and writes its result into
//! the pre-sized slot that came with the input. Slots are disjoint `&mut`
//! borrows, so the result vector itself is never locked. Only the queue and
//! the group's pending count are shared.
//!
//! The submitting thread blocks on the group's condition variable until
//! the pending count reaches zero. There is no cancellation: a submitted
//! batch always runs to completion.

use std::collections::VecDeque;
use std::thread;

use parking_lot::{Condvar, Mutex};

/// Completion bookkeeping for one submitted batch.
pub struct TaskGroup {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl TaskGroup {
    pub fn new(tasks: usize) -> Self {
        TaskGroup {
            pending: Mutex::new(tasks),
            drained: Condvar::new(),
        }
    }

    /// Tasks not yet completed.
    pub fn pending(&self) -> usize {
        *self.pending.lock()
    }

    /// Mark one task done, waking the waiter when the group drains.
    pub fn complete_one(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    /// Release the waiter without finishing the remaining tasks. Used when a
    /// worker unwinds, so the panic reaches the submitter instead of a hang.
    fn abandon(&self) {
        *self.pending.lock() = 0;
        self.drained.notify_all();
    }

    /// Block until every task has completed.
    pub fn wait(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.drained.wait(&mut pending);
        }
    }
}

/// Marks a task done when dropped, including during unwinding.
struct Completion<'a>(&'a TaskGroup);

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abandon();
        } else {
            self.0.complete_one();
        }
    }
}

/// Upper bound on simultaneous workers for a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A pool of at most `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        WorkerPool {
            workers: workers.max(1),
        }
    }

    /// Sized to the machine's available parallelism.
    pub fn with_available_parallelism() -> Self {
        Self::new(thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` over every input and return the results in input order.
    ///
    /// One thread is started per worker state, capped by the pool size and
    /// by the number of inputs; surplus states are dropped unused.
    ///
    /// # Panics
    ///
    /// Panics if `states` is empty while there are inputs, or if a task panics.
    pub fn run<S, T, R, F>(&self, states: Vec<S>, inputs: Vec<T>, task: F) -> Vec<R>
    where
        S: Send,
        T: Send,
        R: Send,
        F: Fn(&mut S, T) -> R + Sync,
    {
        let count = inputs.len();
        if count == 0 {
            return Vec::new();
        }
        let threads = self.workers.min(count).min(states.len());
        assert!(threads > 0, "implementation error: parallel batch without worker state");
        tracing::trace!(tasks = count, workers = threads, "parallel batch");

        let mut slots: Vec<Option<R>> = (0..count).map(|_| None).collect();
        let queue: Mutex<VecDeque<(T, &mut Option<R>)>> =
            Mutex::new(inputs.into_iter().zip(slots.iter_mut()).collect());
        let group = TaskGroup::new(count);

        thread::scope(|scope| {
            for mut state in states.into_iter().take(threads) {
                let queue = &queue;
                let group = &group;
                let task = &task;
                scope.spawn(move || loop {
                    let next = queue.lock().pop_front();
                    let Some((input, slot)) = next else {
                        break;
                    };
                    let _done = Completion(group);
                    *slot = Some(task(&mut state, input));
                });
            }
            group.wait();
        });
        drop(queue);

        slots
            .into_iter()
            .map(|slot| match slot {
                Some(result) => result,
                None => panic!("implementation error: parallel task left its slot empty"),
            })
            .collect()
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

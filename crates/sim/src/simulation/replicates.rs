//! Replicate fan-out over worker threads.
//!
//! Replicates are independent tasks identified by their index. Workers pull
//! indices from a shared counter and push results into a bounded channel,
//! blocking when it is full; the calling thread is the only consumer and
//! sees results in completion order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::sync_channel;
use std::thread;

/// Fixed-size pool of scoped worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicatePool {
    workers: usize,
}

impl ReplicatePool {
    /// Pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Pool sized to the available hardware parallelism.
    pub fn available() -> Self {
        Self::new(thread::available_parallelism().map_or(1, |n| n.get()))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` for every index in `0..replicates` and hand each result to
    /// `consume` on the calling thread.
    ///
    /// The first error, from a task or from `consume`, stops dispatch of new
    /// replicates and is returned once the running ones have finished.
    pub fn run<T, E, F, C>(&self, replicates: usize, task: F, mut consume: C) -> Result<(), E>
    where
        T: Send,
        E: Send,
        F: Fn(usize) -> Result<T, E> + Sync,
        C: FnMut(usize, T) -> Result<(), E>,
    {
        if replicates == 0 {
            return Ok(());
        }
        let workers = self.workers.min(replicates);
        let next = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);

        thread::scope(|scope| {
            // Bounded channel provides backpressure on the workers
            let (tx, rx) = sync_channel::<(usize, Result<T, E>)>(workers);

            for _ in 0..workers {
                let tx = tx.clone();
                let (next, stop, task) = (&next, &stop, &task);
                scope.spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        if index >= replicates {
                            break;
                        }
                        let result = task(index);
                        log::debug!("Replicate {index} finished");
                        if tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            let mut outcome = Ok(());
            for (index, result) in rx.iter() {
                if let Err(e) = result.and_then(|value| consume(index, value)) {
                    stop.store(true, Ordering::Relaxed);
                    outcome = Err(e);
                    break;
                }
            }
            // Unblocks any worker waiting on a full channel
            drop(rx);
            outcome
        })
    }
}

impl Default for ReplicatePool {
    fn default() -> Self {
        Self::available()
    }
}

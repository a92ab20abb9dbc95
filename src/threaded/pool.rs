//! Fixed-size worker pool.
//!
//! Tasks go into a shared queue; `thread_count` scoped workers pull from it
//! until it is empty. A task that returns an error or panics is recorded and
//! the worker moves on to the next one, so the queue is always drained and
//! every worker is joined before the caller sees the outcome.

use crate::error::{MatbenchError, Result};
use crate::threaded::check_thread_count;
use log::debug;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// One unit of data-parallel work.
///
/// Implementors carry read-only references to their inputs and exclusive
/// ownership of the output region they write.
pub trait WorkerTask: Send {
    fn run(self) -> Result<()>;
}

/// Runs every task on a pool of `thread_count` OS threads and waits for all
/// of them.
///
/// # Errors
///
/// `InvalidConfiguration` if `thread_count` is zero. If any task fails, a
/// single `ComputationFailed` carrying every failure message, returned only
/// after all workers have been joined.
pub fn run_tasks<T: WorkerTask>(tasks: Vec<T>, thread_count: usize) -> Result<()> {
    check_thread_count(thread_count)?;

    let total = tasks.len();
    if total == 0 {
        return Ok(());
    }
    let workers = thread_count.min(total);
    debug!("dispatching {} tasks to {} workers", total, workers);

    let queue = Mutex::new(tasks.into_iter());

    let failures = thread::scope(|s| {
        let handles: Vec<_> = (0..workers).map(|_| s.spawn(|| drain(&queue))).collect();

        let mut failures = Vec::new();
        for handle in handles {
            match handle.join() {
                Ok(errors) => failures.extend(errors),
                Err(payload) => failures.push(panic_message(payload.as_ref())),
            }
        }
        failures
    });

    if failures.is_empty() {
        Ok(())
    } else {
        Err(MatbenchError::ComputationFailed {
            failed: failures.len(),
            total,
            message: failures.join("; "),
        })
    }
}

fn drain<T: WorkerTask>(queue: &Mutex<std::vec::IntoIter<T>>) -> Vec<String> {
    let mut failures = Vec::new();
    loop {
        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
        let Some(task) = next else {
            break;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => failures.push(e.to_string()),
            Err(payload) => failures.push(panic_message(payload.as_ref())),
        }
    }
    failures
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", s)
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountTask<'a> {
        counter: &'a AtomicUsize,
        fail: bool,
    }

    impl WorkerTask for CountTask<'_> {
        fn run(self) -> Result<()> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MatbenchError::InvalidConfiguration("boom".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_runs_every_task() {
        let counter = AtomicUsize::new(0);
        let tasks: Vec<_> = (0..10)
            .map(|_| CountTask {
                counter: &counter,
                fail: false,
            })
            .collect();
        run_tasks(tasks, 3).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_failure_reported_once_after_drain() {
        let counter = AtomicUsize::new(0);
        let tasks: Vec<_> = (0..8)
            .map(|i| CountTask {
                counter: &counter,
                fail: i == 2,
            })
            .collect();
        let err = run_tasks(tasks, 4).unwrap_err();
        match err {
            MatbenchError::ComputationFailed { failed, total, .. } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Siblings still ran.
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_zero_threads() {
        let tasks: Vec<CountTask> = Vec::new();
        assert!(matches!(
            run_tasks(tasks, 0),
            Err(MatbenchError::InvalidConfiguration(_))
        ));
    }
}

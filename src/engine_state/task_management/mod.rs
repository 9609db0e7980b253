//! # Task Management System
//!
//! This module runs a bounded burst of independent tasks on scoped worker
//! threads and waits for all of them before returning.
//!
//! ## Architecture Overview
//!
//! - `Task`: a unit of work with a key and an output
//! - `run_scoped`: spawns one scoped thread per task, at most
//!   `max_concurrent` at a time, and joins them batch by batch
//!
//! There are no long-lived worker threads. Every thread spawned by a call is
//! joined before the call returns, which makes the call a hard barrier: code
//! after it can assume all outputs have been delivered.
//!
//! ## Failure Isolation
//! A task that returns an error or panics does not affect the other tasks of
//! the burst. The failure is logged and returned to the caller together with
//! the task's key, so the caller can retry it later.
//!
//! ## Performance Considerations
//! - **Task Granularity**: one task per chunk keeps the spawn cost small next
//!   to the work done
//! - **Blocking**: completion callbacks run on the workers and should only
//!   hold locks for as long as a single insert takes
//!
//! ## Example Usage
//! ```ignore
//! let failures = run_scoped(tasks, 64, |key, output| {
//!     results.lock().unwrap().insert(key, output);
//! });
//! ```

pub mod task;

use std::{any::Any, thread};

use log::error;
use task::Task;

use crate::error::WorldError;

/// Runs `tasks` on scoped worker threads and waits for all of them.
///
/// # Arguments
/// * `tasks` - The tasks to run
/// * `max_concurrent` - Upper bound on threads alive at once; 0 is treated as 1
/// * `on_complete` - Called on the worker thread with each successful output
///
/// # Returns
/// The key and error of every task that failed or panicked.
pub fn run_scoped<T, F>(
    tasks: Vec<T>,
    max_concurrent: usize,
    on_complete: F,
) -> Vec<(T::Key, WorldError)>
where
    T: Task,
    F: Fn(T::Key, T::Output) + Sync,
{
    let limit = max_concurrent.max(1);
    let mut failures = Vec::new();
    let mut pending = tasks.into_iter().peekable();

    while pending.peek().is_some() {
        let batch: Vec<T> = pending.by_ref().take(limit).collect();
        let on_complete = &on_complete;

        thread::scope(|scope| {
            let workers: Vec<_> = batch
                .into_iter()
                .map(|task| {
                    let key = task.key();
                    let worker = scope.spawn(move || {
                        let output = task.process()?;
                        on_complete(key, output);
                        Ok::<(), WorldError>(())
                    });
                    (key, worker)
                })
                .collect();

            for (key, worker) in workers {
                let failure = match worker.join() {
                    Ok(Ok(())) => continue,
                    Ok(Err(failure)) => failure,
                    Err(payload) => WorldError::TaskPanicked {
                        task: format!("{key:?}"),
                        reason: panic_message(payload.as_ref()),
                    },
                };
                error!("Task {:?} failed and was skipped: {}", key, failure);
                failures.push((key, failure));
            }
        });
    }

    failures
}

/// Extracts the message of a panic payload when it is a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

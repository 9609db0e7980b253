//! # Task System Core Trait
//!
//! This module defines the unit of work handed to the scoped worker burst.
//!
//! ## Task Lifecycle
//! 1. A batch of `Task`s is passed to [`run_scoped`](super::run_scoped)
//! 2. Each task's `process()` method runs on its own scoped worker thread
//! 3. The output is handed to the completion callback on that same worker
//! 4. Every worker is joined before `run_scoped` returns
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto a worker thread
//! - Tasks may borrow shared, immutable state from the caller since workers
//!   never outlive the call that spawned them

use std::fmt::Debug;

use crate::error::Result;

/// A unit of work that can be executed on a scoped worker thread.
///
/// # Implementation Guidelines
/// - Should be coarse-grained enough to amortize the cost of a thread spawn
/// - Must not touch state owned by the calling thread other than through
///   shared references
/// - Errors are reported through the returned `Result`; a panic is caught by
///   the runner and reported as [`WorldError::TaskPanicked`](crate::error::WorldError::TaskPanicked)
pub trait Task: Send {
    /// Identifies the task in logs and failure reports.
    type Key: Copy + Send + Debug;

    /// The value produced by a successful run.
    type Output: Send;

    /// The key of this task.
    fn key(&self) -> Self::Key;

    /// Processes the task.
    ///
    /// # Returns
    /// The task's output, or the error that stopped it.
    fn process(&self) -> Result<Self::Output>;
}

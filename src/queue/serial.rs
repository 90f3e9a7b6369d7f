// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial queue backed by a tokio task.

use std::panic::AssertUnwindSafe;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::{Error, Result};

use super::{Job, JobId, WorkQueue};

/// How a [`SerialQueue`] runs its jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Each job runs on tokio's blocking pool, one at a time. For jobs that
    /// call blocking account methods.
    Blocking,
    /// Each job runs directly on the queue task. For short, non-blocking jobs
    /// such as observer announcements.
    Inline,
}

struct Envelope {
    id: JobId,
    job: Job,
}

/// A queue that runs jobs one after another, in submission order.
///
/// The queue is drained by a tokio task spawned at construction. The task
/// ends once every handle to the queue has been dropped and the pending jobs
/// have run. A job that panics is logged and does not stop the queue.
///
/// # Examples
///
/// ```
/// use constellation_lib::queue::{SerialQueue, WorkQueue, barrier};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> constellation_lib::Result<()> {
/// let queue = SerialQueue::background("example")?;
/// queue.submit(Box::new(|| println!("runs on the blocking pool")));
/// assert!(barrier(&queue).await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SerialQueue {
    label: String,
    mode: ExecutionMode,
    sender: mpsc::UnboundedSender<Envelope>,
}

impl SerialQueue {
    /// Creates a queue whose jobs may block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] if called outside of a tokio runtime.
    pub fn background(label: impl Into<String>) -> Result<Self> {
        Self::spawn(label.into(), ExecutionMode::Blocking)
    }

    /// Creates a queue for short jobs that run on the queue task itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] if called outside of a tokio runtime.
    pub fn main(label: impl Into<String>) -> Result<Self> {
        Self::spawn(label.into(), ExecutionMode::Inline)
    }

    fn spawn(label: String, mode: ExecutionMode) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let (sender, receiver) = mpsc::unbounded_channel();

        handle.spawn(run_queue(label.clone(), mode, receiver));

        Ok(Self {
            label,
            mode,
            sender,
        })
    }

    /// Returns the label used in log lines.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns how the queue runs its jobs.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns `true` if the queue task has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl WorkQueue for SerialQueue {
    fn submit(&self, job: Job) {
        let id = JobId::new();
        tracing::trace!(queue = %self.label, job = %id, "Job submitted");

        if self.sender.send(Envelope { id, job }).is_err() {
            tracing::warn!(queue = %self.label, job = %id, "Queue closed, dropping job");
        }
    }
}

async fn run_queue(
    label: String,
    mode: ExecutionMode,
    mut receiver: mpsc::UnboundedReceiver<Envelope>,
) {
    tracing::debug!(queue = %label, ?mode, "Starting work queue");

    while let Some(Envelope { id, job }) = receiver.recv().await {
        tracing::trace!(queue = %label, job = %id, "Running job");

        let outcome = match mode {
            ExecutionMode::Blocking => tokio::task::spawn_blocking(job)
                .await
                .map_err(|e| e.to_string()),
            ExecutionMode::Inline => std::panic::catch_unwind(AssertUnwindSafe(job))
                .map_err(|_| "job panicked".to_string()),
        };

        if let Err(error) = outcome {
            tracing::error!(queue = %label, job = %id, %error, "Job did not complete");
        }
    }

    tracing::debug!(queue = %label, "Work queue stopped");
}

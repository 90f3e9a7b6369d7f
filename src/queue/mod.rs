// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialized execution contexts.
//!
//! The constellation runs every account operation as a [`Job`] on a
//! [`WorkQueue`]. Jobs on one queue run in submission order and never
//! overlap. Announcements go through a second queue so observers never run
//! on the work queue.
//!
//! - [`SerialQueue`] - production queue drained by a tokio task
//! - [`InlineQueue`] - runs jobs on the submitting thread, for tests

mod inline;
mod job_id;
mod serial;

use tokio::sync::oneshot;

pub use inline::InlineQueue;
pub use job_id::JobId;
pub use serial::{ExecutionMode, SerialQueue};

/// A unit of work submitted to a queue.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A serialized execution context.
///
/// Implementations must run jobs in submission order without overlap.
/// Submission never blocks and never fails; a queue that can no longer run
/// jobs drops them and logs.
pub trait WorkQueue: Send + Sync {
    /// Enqueues a job.
    fn submit(&self, job: Job);
}

/// Waits until every job submitted to `queue` before this call has run.
///
/// Returns `false` if the queue dropped the marker job.
pub async fn barrier(queue: &dyn WorkQueue) -> bool {
    let (tx, rx) = oneshot::channel();
    queue.submit(Box::new(move || {
        let _ = tx.send(());
    }));
    rx.await.is_ok()
}

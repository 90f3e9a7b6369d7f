// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronous queue.

use super::{Job, WorkQueue};

/// A queue that runs every job immediately on the submitting thread.
///
/// Jobs submitted from the same thread still execute in submission order and
/// never overlap, which makes this queue a deterministic stand-in for
/// [`SerialQueue`](super::SerialQueue) in tests. It does not need a tokio
/// runtime.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use constellation_lib::queue::{InlineQueue, WorkQueue};
///
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&ran);
///
/// InlineQueue.submit(Box::new(move || flag.store(true, Ordering::SeqCst)));
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineQueue;

impl WorkQueue for InlineQueue {
    fn submit(&self, job: Job) {
        job();
    }
}

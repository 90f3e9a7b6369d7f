// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Job identifier type.

use std::fmt;

use uuid::Uuid;

/// Identifier attached to every queued job.
///
/// Used as a tracing field so log lines emitted by one job can be grouped.
///
/// # Examples
///
/// ```
/// use constellation_lib::queue::JobId;
///
/// let id = JobId::new();
/// assert_ne!(id, JobId::new());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Creates a new unique job identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 characters are enough to tell jobs apart in logs
        let short = &self.0.simple().to_string()[..8];
        write!(f, "JobId({short}...)")
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

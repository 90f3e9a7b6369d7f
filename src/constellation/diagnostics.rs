// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Counters for constellation health.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by the work queue.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    refreshes_succeeded: AtomicU64,
    refreshes_failed: AtomicU64,
    stale_refreshes_discarded: AtomicU64,
    multiple_local_devices: AtomicU64,
    push_subscriptions_expired: AtomicU64,
    degraded_failures: AtomicU64,
}

impl Diagnostics {
    pub(crate) fn record_refresh_succeeded(&self) {
        self.refreshes_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refresh_failed(&self) {
        self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale_refresh(&self) {
        self.stale_refreshes_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_multiple_local_devices(&self) {
        self.multiple_local_devices.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_push_subscription_expired(&self) {
        self.push_subscriptions_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_degraded_failure(&self) {
        self.degraded_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            refreshes_succeeded: self.refreshes_succeeded.load(Ordering::Relaxed),
            refreshes_failed: self.refreshes_failed.load(Ordering::Relaxed),
            stale_refreshes_discarded: self.stale_refreshes_discarded.load(Ordering::Relaxed),
            multiple_local_devices: self.multiple_local_devices.load(Ordering::Relaxed),
            push_subscriptions_expired: self.push_subscriptions_expired.load(Ordering::Relaxed),
            degraded_failures: self.degraded_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time read-out of the constellation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagnosticsSnapshot {
    /// Refreshes that replaced the snapshot.
    pub refreshes_succeeded: u64,
    /// Refreshes whose fetch failed.
    pub refreshes_failed: u64,
    /// Refreshes whose result was older than the held snapshot.
    pub stale_refreshes_discarded: u64,
    /// Fetched device lists with more than one current device.
    pub multiple_local_devices: u64,
    /// Refreshes reporting the local push subscription as expired.
    pub push_subscriptions_expired: u64,
    /// Failures of best-effort operations, refreshes included.
    pub degraded_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reads_counters() {
        let diagnostics = Diagnostics::default();
        diagnostics.record_refresh_succeeded();
        diagnostics.record_refresh_succeeded();
        diagnostics.record_multiple_local_devices();
        diagnostics.record_degraded_failure();

        let snapshot = diagnostics.snapshot();
        assert_eq!(snapshot.refreshes_succeeded, 2);
        assert_eq!(snapshot.multiple_local_devices, 1);
        assert_eq!(snapshot.degraded_failures, 1);
        assert_eq!(snapshot.refreshes_failed, 0);
    }
}

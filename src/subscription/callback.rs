// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for constellation subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::OperationFailure;
use crate::event::ConstellationEvent;
use crate::state::ConstellationState;

use super::Notifier;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later.
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for snapshot callbacks.
type StateCallback = Arc<dyn Fn(Arc<ConstellationState>) + Send + Sync>;

/// Type alias for failure callbacks.
type FailureCallback = Arc<dyn Fn(&OperationFailure) + Send + Sync>;

/// Type alias for expired push subscription callbacks (receives the device ID).
type ExpiredCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Registry for constellation callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability. Dispatch clones the
/// registered callbacks out of the lock before invoking them, so a callback
/// may register or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// New snapshot callbacks.
    state_callbacks: RwLock<HashMap<SubscriptionId, StateCallback>>,
    /// Degraded failure callbacks.
    failure_callbacks: RwLock<HashMap<SubscriptionId, FailureCallback>>,
    /// Expired push subscription callbacks.
    expired_callbacks: RwLock<HashMap<SubscriptionId, ExpiredCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_callbacks: RwLock::new(HashMap::new()),
            failure_callbacks: RwLock::new(HashMap::new()),
            expired_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for new snapshots.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Arc<ConstellationState>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failures of best-effort operations.
    ///
    /// This is the telemetry hook for failures that are otherwise only logged.
    pub fn on_operation_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OperationFailure) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failure_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for an expired local push subscription.
    pub fn on_push_subscription_expired<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.expired_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_callbacks.write().remove(&id).is_some()
            || self.failure_callbacks.write().remove(&id).is_some()
            || self.expired_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_callbacks.write().clear();
        self.failure_callbacks.write().clear();
        self.expired_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches an event to the matching callbacks.
    ///
    /// Callbacks are called synchronously in an arbitrary order.
    pub fn dispatch(&self, event: &ConstellationEvent) {
        match event {
            ConstellationEvent::StateUpdated(state) => {
                let callbacks: Vec<_> = self.state_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(Arc::clone(state));
                }
            }
            ConstellationEvent::OperationFailed(failure) => {
                let callbacks: Vec<_> = self.failure_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(failure);
                }
            }
            ConstellationEvent::PushSubscriptionExpired { device_id } => {
                let callbacks: Vec<_> = self.expired_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(device_id);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_callbacks.read().len()
            + self.failure_callbacks.read().len()
            + self.expired_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for CallbackRegistry {
    fn notify(&self, event: &ConstellationEvent) {
        self.dispatch(event);
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

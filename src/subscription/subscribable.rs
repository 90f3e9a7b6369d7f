// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that announce constellation events.

use std::sync::Arc;

use crate::error::OperationFailure;
use crate::state::ConstellationState;
use crate::subscription::SubscriptionId;

/// Trait for types that support callback subscriptions.
///
/// Callbacks run on the main queue, never on the work queue.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use constellation_lib::account::AccountClient;
/// use constellation_lib::constellation::DeviceConstellation;
/// use constellation_lib::subscription::Subscribable;
///
/// # async fn example(account: Arc<dyn AccountClient>) -> constellation_lib::Result<()> {
/// let constellation = DeviceConstellation::builder(account).build()?;
///
/// let sub_id = constellation.on_state_changed(|state| {
///     println!("{} remote devices", state.remote_devices().len());
/// });
///
/// constellation.refresh();
/// constellation.flush().await;
///
/// constellation.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to new snapshots.
    ///
    /// Called exactly once per successful refresh.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Arc<ConstellationState>) + Send + Sync + 'static;

    /// Subscribes to failures of best-effort operations.
    fn on_operation_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OperationFailure) + Send + Sync + 'static;

    /// Subscribes to the server flagging the local push subscription as
    /// expired. The callback receives the local device ID.
    fn on_push_subscription_expired<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

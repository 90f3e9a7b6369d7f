// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer fan-out.

use crate::event::ConstellationEvent;

/// Receives constellation announcements.
///
/// Notifiers are invoked on the main queue only, with finished snapshots and
/// failure reports. Delivery is best-effort: a notifier cannot fail the
/// operation that produced the event.
///
/// Closures taking a `&ConstellationEvent` implement this trait.
///
/// # Examples
///
/// ```
/// use constellation_lib::event::ConstellationEvent;
/// use constellation_lib::subscription::Notifier;
///
/// let printer = |event: &ConstellationEvent| println!("{}", event.name());
/// printer.notify(&ConstellationEvent::PushSubscriptionExpired {
///     device_id: "me".to_string(),
/// });
/// ```
pub trait Notifier: Send + Sync {
    /// Handles one event.
    fn notify(&self, event: &ConstellationEvent);
}

impl<F> Notifier for F
where
    F: Fn(&ConstellationEvent) + Send + Sync,
{
    fn notify(&self, event: &ConstellationEvent) {
        self(event);
    }
}

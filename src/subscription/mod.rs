// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer registration.
//!
//! The constellation announces new snapshots and degraded failures through
//! a list of [`Notifier`]s. Two notifiers are always installed:
//!
//! - [`CallbackRegistry`] - closures registered through [`Subscribable`]
//! - [`EventBus`](crate::event::EventBus) - a broadcast channel
//!
//! Hosts can add their own notifiers when building the constellation, for
//! example to forward state updates into a UI framework's event loop.

mod callback;
mod notifier;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use notifier::Notifier;
pub use subscribable::Subscribable;

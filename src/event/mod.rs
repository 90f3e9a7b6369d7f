// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device events and constellation announcements.
//!
//! - [`DeviceEventOutgoing`] - events sent to another device (send tab)
//! - [`DeviceEventIncoming`] - events received by polling or push
//! - [`ConstellationEvent`] - announcements about the constellation itself,
//!   broadcast through the [`EventBus`]
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use constellation_lib::event::{ConstellationEvent, EventBus};
//! use constellation_lib::state::ConstellationState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ConstellationEvent::StateUpdated(Arc::new(ConstellationState::default())));
//! ```

mod constellation_event;
mod event_bus;
mod incoming;
mod outgoing;

pub use constellation_event::{
    ConstellationEvent, OPERATION_FAILED_EVENT, PUSH_SUBSCRIPTION_EXPIRED_EVENT,
    STATE_UPDATE_EVENT,
};
pub use event_bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use incoming::{DeviceEventIncoming, TabHistoryEntry};
pub use outgoing::DeviceEventOutgoing;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device constellation: cached device state and device events.
//!
//! # Overview
//!
//! [`DeviceConstellation`] is created once per account session. It provides:
//!
//! - **Cached state**: the latest [`ConstellationState`](crate::state::ConstellationState),
//!   readable at any time without I/O
//! - **Serialized account work**: refreshes, renames, sends, polls and push
//!   decoding run one at a time on a work queue, in submission order
//! - **Announcements**: new snapshots and degraded failures are delivered to
//!   callbacks, a broadcast channel and custom notifiers on a separate main
//!   queue
//!
//! # Examples
//!
//! ## Refresh and watch
//!
//! ```no_run
//! use std::sync::Arc;
//! use constellation_lib::account::AccountClient;
//! use constellation_lib::constellation::DeviceConstellation;
//! use constellation_lib::event::ConstellationEvent;
//!
//! # async fn example(account: Arc<dyn AccountClient>) -> constellation_lib::Result<()> {
//! let constellation = DeviceConstellation::new(account)?;
//! let mut events = constellation.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             ConstellationEvent::StateUpdated(state) => {
//!                 println!("{} remote devices", state.remote_devices().len());
//!             }
//!             ConstellationEvent::OperationFailed(failure) => {
//!                 println!("degraded: {failure}");
//!             }
//!             ConstellationEvent::PushSubscriptionExpired { .. } => {}
//!         }
//!     }
//! });
//!
//! constellation.refresh();
//! # Ok(())
//! # }
//! ```
//!
//! ## Handling a push message
//!
//! ```no_run
//! # use constellation_lib::constellation::DeviceConstellation;
//! # async fn example(constellation: DeviceConstellation, payload: String) {
//! match constellation.process_push_payload(payload).await {
//!     Ok(events) => println!("{} events", events.len()),
//!     Err(e) => eprintln!("push payload rejected: {e}"),
//! }
//! # }
//! ```

mod builder;
mod config;
mod device_constellation;
mod diagnostics;

pub use builder::DeviceConstellationBuilder;
pub use config::{ConstellationConfig, DEFAULT_QUEUE_LABEL};
pub use device_constellation::{DeviceConstellation, EventsResult};
pub use diagnostics::DiagnosticsSnapshot;

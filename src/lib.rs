// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constellation Lib - keep an account's device constellation in sync.
//!
//! A constellation is the set of devices registered to one account. This
//! library keeps the local device's view of it up to date and exchanges
//! device events (such as sending a tab) with the other devices.
//!
//! # Supported Features
//!
//! - **Cached device list**: local device and remote devices, refreshed on demand
//! - **Local device management**: rename, registration, capability sync
//! - **Send tab**: best-effort delivery of tabs to other devices
//! - **Incoming events**: polling for missed events and push payload decoding
//! - **Observers**: callbacks, a broadcast channel and custom notifiers
//!
//! The account session itself (network I/O, signing) is provided by the host
//! through the [`AccountClient`](account::AccountClient) trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use constellation_lib::account::AccountClient;
//! use constellation_lib::constellation::DeviceConstellation;
//! use constellation_lib::event::DeviceEventOutgoing;
//! use constellation_lib::subscription::Subscribable;
//!
//! # async fn example(account: Arc<dyn AccountClient>) -> constellation_lib::Result<()> {
//! let constellation = DeviceConstellation::new(account)?;
//!
//! constellation.on_state_changed(|state| {
//!     for device in state.remote_devices() {
//!         println!("{} ({})", device.display_name, device.device_type);
//!     }
//! });
//!
//! constellation.refresh();
//! constellation.send_event_to_device(
//!     "device-42",
//!     DeviceEventOutgoing::send_tab("Example", "https://example.com"),
//! );
//!
//! let events = constellation.poll_events().await?;
//! println!("{} events waiting", events.len());
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod constellation;
pub mod device;
pub mod error;
pub mod event;
pub mod queue;
pub mod state;
pub mod subscription;
pub mod types;

pub use account::AccountClient;
pub use constellation::{ConstellationConfig, DeviceConstellation, DiagnosticsSnapshot};
pub use device::{Device, DevicePushSubscription};
pub use error::{AccountError, Error, FailureKind, Operation, OperationFailure, Result};
pub use event::{ConstellationEvent, DeviceEventIncoming, DeviceEventOutgoing, EventBus};
pub use state::ConstellationState;
pub use subscription::{CallbackRegistry, Notifier, Subscribable, SubscriptionId};
pub use types::{Capabilities, DeviceCapability, DeviceType};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constellation snapshots.
//!
//! A [`ConstellationState`] is the immutable result of one refresh: the
//! local device, if the server identified it, and every other device of the
//! account in server order.
//!
//! # Examples
//!
//! ```
//! use constellation_lib::device::Device;
//! use constellation_lib::state::ConstellationState;
//! use constellation_lib::types::DeviceType;
//!
//! let state = ConstellationState::from_devices(vec![
//!     Device::new("a", "Laptop", DeviceType::Desktop),
//! ]);
//!
//! assert!(state.local_device().is_none());
//! assert_eq!(state.remote_devices().len(), 1);
//! ```

mod constellation_state;

pub use constellation_state::ConstellationState;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Capabilities, DeviceCapability, DeviceType};

use super::DevicePushSubscription;

/// A device registered to the account.
///
/// Records are produced by the account service and treated as read-only
/// values by this crate; a refresh always replaces them wholesale.
///
/// # Examples
///
/// ```
/// use constellation_lib::device::Device;
/// use constellation_lib::types::{DeviceCapability, DeviceType};
///
/// let phone = Device::new("device-1", "Alice's Phone", DeviceType::Mobile)
///     .with_capability(DeviceCapability::SendTab)
///     .as_current_device();
///
/// assert!(phone.is_current_device);
/// assert!(phone.supports(&DeviceCapability::SendTab));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Stable identifier assigned by the account service.
    pub id: String,
    /// Human readable name.
    pub display_name: String,
    /// Form factor.
    #[serde(default)]
    pub device_type: DeviceType,
    /// Whether this record describes the device this crate runs on.
    #[serde(default)]
    pub is_current_device: bool,
    /// Whether the server considers the device's push subscription stale.
    #[serde(default)]
    pub push_subscription_expired: bool,
    /// Commands the device can receive.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Last time the device talked to the account service.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_access_time: Option<DateTime<Utc>>,
    /// Push credentials the server has on file for the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_subscription: Option<DevicePushSubscription>,
}

impl Device {
    /// Creates a remote device record with no capabilities.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            device_type,
            is_current_device: false,
            push_subscription_expired: false,
            capabilities: Capabilities::new(),
            last_access_time: None,
            push_subscription: None,
        }
    }

    /// Marks the record as the current device.
    #[must_use]
    pub fn as_current_device(mut self) -> Self {
        self.is_current_device = true;
        self
    }

    /// Adds a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: DeviceCapability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Marks the device's push subscription as expired.
    #[must_use]
    pub fn with_expired_push_subscription(mut self) -> Self {
        self.push_subscription_expired = true;
        self
    }

    /// Sets the last access time.
    #[must_use]
    pub fn with_last_access_time(mut self, time: DateTime<Utc>) -> Self {
        self.last_access_time = Some(time);
        self
    }

    /// Returns `true` if the device declares the capability.
    #[must_use]
    pub fn supports(&self, capability: &DeviceCapability) -> bool {
        self.capabilities.contains(capability)
    }
}

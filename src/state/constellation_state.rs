// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable snapshot of the constellation.

use serde::Serialize;

use crate::device::Device;
use crate::types::DeviceCapability;

/// The constellation as seen by one completed refresh.
///
/// A snapshot is never mutated. Each successful refresh builds a new one and
/// replaces the previous snapshot as a whole.
///
/// # Examples
///
/// ```
/// use constellation_lib::device::Device;
/// use constellation_lib::state::ConstellationState;
/// use constellation_lib::types::DeviceType;
///
/// let state = ConstellationState::from_devices(vec![
///     Device::new("a", "Laptop", DeviceType::Desktop),
///     Device::new("b", "Phone", DeviceType::Mobile).as_current_device(),
/// ]);
///
/// assert_eq!(state.local_device().map(|d| d.id.as_str()), Some("b"));
/// assert_eq!(state.remote_devices().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstellationState {
    local_device: Option<Device>,
    remote_devices: Vec<Device>,
}

impl ConstellationState {
    /// Creates a snapshot from already partitioned parts.
    ///
    /// Remote entries flagged as current are dropped.
    #[must_use]
    pub fn new(local_device: Option<Device>, remote_devices: Vec<Device>) -> Self {
        let remote_devices = remote_devices
            .into_iter()
            .filter(|d| !d.is_current_device)
            .collect();
        Self {
            local_device,
            remote_devices,
        }
    }

    /// Partitions a fetched device list.
    ///
    /// The first entry flagged as current becomes the local device. Every
    /// entry not flagged as current becomes a remote device, in the order it
    /// was fetched. Further entries flagged as current are an inconsistency of
    /// the account service and are left out of the snapshot.
    #[must_use]
    pub fn from_devices(devices: Vec<Device>) -> Self {
        let mut local_device = None;
        let mut remote_devices = Vec::with_capacity(devices.len());

        for device in devices {
            if !device.is_current_device {
                remote_devices.push(device);
            } else if local_device.is_none() {
                local_device = Some(device);
            }
        }

        Self {
            local_device,
            remote_devices,
        }
    }

    /// Returns the device this crate runs on, if the server identified it.
    #[must_use]
    pub fn local_device(&self) -> Option<&Device> {
        self.local_device.as_ref()
    }

    /// Returns the other devices of the account, in server order.
    #[must_use]
    pub fn remote_devices(&self) -> &[Device] {
        &self.remote_devices
    }

    /// Iterates over the local device (if known) followed by remote devices.
    pub fn all_devices(&self) -> impl Iterator<Item = &Device> {
        self.local_device.iter().chain(self.remote_devices.iter())
    }

    /// Looks up any device by ID.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.all_devices().find(|d| d.id == id)
    }

    /// Looks up a remote device by ID.
    #[must_use]
    pub fn remote_device(&self, id: &str) -> Option<&Device> {
        self.remote_devices.iter().find(|d| d.id == id)
    }

    /// Returns the remote devices declaring a capability.
    pub fn remote_devices_with<'a>(
        &'a self,
        capability: &'a DeviceCapability,
    ) -> impl Iterator<Item = &'a Device> + 'a {
        self.remote_devices
            .iter()
            .filter(move |d| d.supports(capability))
    }

    /// Returns `true` if the local device's push subscription expired.
    #[must_use]
    pub fn push_subscription_expired(&self) -> bool {
        self.local_device
            .as_ref()
            .is_some_and(|d| d.push_subscription_expired)
    }

    /// Returns `true` if the snapshot holds no device at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local_device.is_none() && self.remote_devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceType;

    fn remote(id: &str) -> Device {
        Device::new(id, id, DeviceType::Desktop)
    }

    fn current(id: &str) -> Device {
        Device::new(id, id, DeviceType::Mobile).as_current_device()
    }

    #[test]
    fn no_current_device_keeps_full_list_remote() {
        let devices = vec![remote("a"), remote("b"), remote("c")];
        let state = ConstellationState::from_devices(devices.clone());

        assert!(state.local_device().is_none());
        assert_eq!(state.remote_devices(), devices.as_slice());
    }

    #[test]
    fn current_device_is_split_out_preserving_order() {
        let state =
            ConstellationState::from_devices(vec![remote("a"), current("me"), remote("b")]);

        assert_eq!(state.local_device().unwrap().id, "me");
        let ids: Vec<_> = state.remote_devices().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn first_current_device_wins() {
        let state = ConstellationState::from_devices(vec![
            current("first"),
            remote("a"),
            current("second"),
        ]);

        assert_eq!(state.local_device().unwrap().id, "first");
        assert!(state.remote_devices().iter().all(|d| !d.is_current_device));
        assert_eq!(state.remote_devices().len(), 1);
    }

    #[test]
    fn new_drops_current_entries_from_remotes() {
        let state = ConstellationState::new(None, vec![current("x"), remote("y")]);
        assert_eq!(state.remote_devices().len(), 1);
        assert_eq!(state.remote_devices()[0].id, "y");
    }

    #[test]
    fn lookups() {
        let state = ConstellationState::from_devices(vec![
            current("me"),
            remote("a").with_capability(DeviceCapability::SendTab),
            remote("b"),
        ]);

        assert!(state.device("me").is_some());
        assert!(state.remote_device("me").is_none());
        assert!(state.remote_device("b").is_some());
        assert_eq!(state.all_devices().count(), 3);

        let send_tab = DeviceCapability::SendTab;
        let targets: Vec<_> = state.remote_devices_with(&send_tab).collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "a");
    }

    #[test]
    fn push_subscription_expired_reads_local_device() {
        let state = ConstellationState::from_devices(vec![
            Device::new("me", "me", DeviceType::Mobile)
                .as_current_device()
                .with_expired_push_subscription(),
        ]);
        assert!(state.push_subscription_expired());

        let empty = ConstellationState::default();
        assert!(!empty.push_subscription_expired());
        assert!(empty.is_empty());
    }
}

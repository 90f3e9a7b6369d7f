// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account session interface.
//!
//! The account session performs the authenticated network calls and the
//! cryptography behind them. This crate only consumes it through the
//! [`AccountClient`] trait; hosts plug in their own implementation.

use crate::device::{Device, DevicePushSubscription};
use crate::error::AccountError;
use crate::event::DeviceEventIncoming;
use crate::types::{Capabilities, DeviceType};

/// Authenticated access to the account service.
///
/// Every method is a blocking call that either succeeds or fails once; the
/// client does not retry and owns any timeout policy. The constellation only
/// calls these methods from its work queue, except
/// [`set_device_push_subscription`](Self::set_device_push_subscription)
/// which runs on the caller of
/// [`DeviceConstellation::set_device_push_subscription`](crate::constellation::DeviceConstellation::set_device_push_subscription).
pub trait AccountClient: Send + Sync {
    /// Fetches every device registered to the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn fetch_devices(&self) -> Result<Vec<Device>, AccountError>;

    /// Renames the local device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn set_device_display_name(&self, name: &str) -> Result<(), AccountError>;

    /// Registers the local device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn initialize_device(
        &self,
        name: &str,
        device_type: DeviceType,
        capabilities: &Capabilities,
    ) -> Result<(), AccountError>;

    /// Makes the server's view of the local device's capabilities match
    /// `capabilities`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn ensure_capabilities(&self, capabilities: &Capabilities) -> Result<(), AccountError>;

    /// Sends a tab to another device.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is unknown, incapable, or unreachable.
    fn send_event(&self, target_device_id: &str, title: &str, url: &str)
    -> Result<(), AccountError>;

    /// Fetches commands queued for the local device since the last poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn poll_device_commands(&self) -> Result<Vec<DeviceEventIncoming>, AccountError>;

    /// Registers push transport credentials for the local device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn set_device_push_subscription(
        &self,
        subscription: &DevicePushSubscription,
    ) -> Result<(), AccountError>;

    /// Decodes a push payload into device events.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::MalformedPayload`] if the payload cannot be
    /// decoded, or another error if fetching the referenced commands fails.
    fn handle_push_message(&self, payload: &str) -> Result<Vec<DeviceEventIncoming>, AccountError>;
}

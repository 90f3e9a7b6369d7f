// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events sent to another device.

use serde::{Deserialize, Serialize};

use crate::types::DeviceCapability;

/// An event the local device sends to a remote device.
///
/// # Examples
///
/// ```
/// use constellation_lib::event::DeviceEventOutgoing;
/// use constellation_lib::types::DeviceCapability;
///
/// let event = DeviceEventOutgoing::send_tab("Example", "https://example.com");
/// assert_eq!(event.required_capability(), DeviceCapability::SendTab);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum DeviceEventOutgoing {
    /// Open a tab on the target device.
    SendTab {
        /// Page title.
        title: String,
        /// Page URL.
        url: String,
    },
}

impl DeviceEventOutgoing {
    /// Creates a send-tab event.
    #[must_use]
    pub fn send_tab(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::SendTab {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Returns the capability the target must declare to handle the event.
    #[must_use]
    pub fn required_capability(&self) -> DeviceCapability {
        match self {
            Self::SendTab { .. } => DeviceCapability::SendTab,
        }
    }
}

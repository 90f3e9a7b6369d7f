// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities.
//!
//! Capabilities are passed through between the caller and the account
//! service without negotiation. Values this crate does not know are kept
//! verbatim in [`DeviceCapability::Other`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A command a device declares it can receive.
///
/// # Examples
///
/// ```
/// use constellation_lib::types::DeviceCapability;
///
/// assert_eq!(DeviceCapability::from("sendTab"), DeviceCapability::SendTab);
/// assert_eq!(
///     DeviceCapability::from("playMusic"),
///     DeviceCapability::Other("playMusic".to_string())
/// );
/// assert_eq!(DeviceCapability::CloseTabs.as_str(), "closeTabs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceCapability {
    /// Can receive tabs.
    SendTab,
    /// Can be asked to close tabs.
    CloseTabs,
    /// A capability this crate does not interpret.
    Other(String),
}

impl DeviceCapability {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SendTab => "sendTab",
            Self::CloseTabs => "closeTabs",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for DeviceCapability {
    fn from(value: &str) -> Self {
        match value {
            "sendTab" => Self::SendTab,
            "closeTabs" => Self::CloseTabs,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for DeviceCapability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sendTab" => Self::SendTab,
            "closeTabs" => Self::CloseTabs,
            _ => Self::Other(value),
        }
    }
}

impl From<DeviceCapability> for String {
    fn from(value: DeviceCapability) -> Self {
        match value {
            DeviceCapability::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeviceCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of capabilities.
pub type Capabilities = BTreeSet<DeviceCapability>;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device form factor.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of hardware a device runs on.
///
/// Unrecognised values coming from the account service map to
/// [`DeviceType::Unknown`] instead of failing, so a new form factor on the
/// server never breaks a refresh.
///
/// # Examples
///
/// ```
/// use constellation_lib::types::DeviceType;
///
/// let mobile: DeviceType = "Mobile".parse().unwrap();
/// assert_eq!(mobile, DeviceType::Mobile);
/// assert_eq!(mobile.as_str(), "mobile");
///
/// let fridge: DeviceType = "fridge".parse().unwrap();
/// assert_eq!(fridge, DeviceType::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Desktop or laptop computer.
    Desktop,
    /// Phone.
    Mobile,
    /// Tablet.
    Tablet,
    /// In-car system.
    Vehicle,
    /// Television or set-top box.
    Tv,
    /// Anything else, including values this crate does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Vehicle => "vehicle",
            Self::Tv => "tv",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "desktop" => Self::Desktop,
            "mobile" | "phone" => Self::Mobile,
            "tablet" => Self::Tablet,
            "vehicle" => Self::Vehicle,
            "tv" => Self::Tv,
            _ => Self::Unknown,
        })
    }
}

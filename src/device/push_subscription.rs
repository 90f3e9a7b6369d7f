// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push transport credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials the account service uses to wake a device through its push
/// transport.
///
/// The values are opaque to this crate. `Debug` output redacts both keys.
///
/// # Examples
///
/// ```
/// use constellation_lib::device::DevicePushSubscription;
///
/// let sub = DevicePushSubscription::new("https://push.example/abc", "pk", "s3cret");
/// assert!(!format!("{sub:?}").contains("s3cret"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePushSubscription {
    /// Push endpoint URL.
    pub endpoint: String,
    /// Public key used to encrypt messages for the device.
    pub public_key: String,
    /// Authentication secret shared with the push service.
    pub auth_key: String,
}

impl DevicePushSubscription {
    /// Creates a new subscription.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        public_key: impl Into<String>,
        auth_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            public_key: public_key.into(),
            auth_key: auth_key.into(),
        }
    }
}

impl fmt::Debug for DevicePushSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevicePushSubscription")
            .field("endpoint", &self.endpoint)
            .field("public_key", &"<redacted>")
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

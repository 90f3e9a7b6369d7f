// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the device constellation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::DEFAULT_CHANNEL_CAPACITY;

/// Default label of the work queue in log lines.
pub const DEFAULT_QUEUE_LABEL: &str = "constellation";

/// Configuration for a [`DeviceConstellation`](super::DeviceConstellation).
///
/// # Examples
///
/// ```
/// use constellation_lib::constellation::ConstellationConfig;
///
/// let config = ConstellationConfig::new()
///     .with_event_capacity(64)
///     .with_reregister_expired_push(false);
///
/// assert_eq!(config.event_capacity, 64);
/// assert!(!config.reregister_expired_push);
///
/// // Missing fields keep their defaults
/// let parsed = ConstellationConfig::from_json(r#"{"queueLabel": "fxa"}"#).unwrap();
/// assert_eq!(parsed.queue_label, "fxa");
/// assert!(parsed.reregister_expired_push);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConstellationConfig {
    /// Capacity of the broadcast channel returned by `subscribe`.
    pub event_capacity: usize,
    /// Re-register the stored push subscription when a refresh reports it
    /// as expired.
    pub reregister_expired_push: bool,
    /// Label of the work queue in log lines. The main queue uses the same
    /// label with a `-main` suffix.
    pub queue_label: String,
}

impl ConstellationConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the document is not
    /// valid JSON or contains unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the broadcast channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Enables or disables automatic push re-registration.
    #[must_use]
    pub fn with_reregister_expired_push(mut self, enabled: bool) -> Self {
        self.reregister_expired_push = enabled;
        self
    }

    /// Sets the work queue label.
    #[must_use]
    pub fn with_queue_label(mut self, label: impl Into<String>) -> Self {
        self.queue_label = label.into();
        self
    }
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
            reregister_expired_push: true,
            queue_label: DEFAULT_QUEUE_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn defaults() {
        let config = ConstellationConfig::default();
        assert_eq!(config.event_capacity, 256);
        assert!(config.reregister_expired_push);
        assert_eq!(config.queue_label, "constellation");
    }

    #[test]
    fn from_json_full() {
        let json = r#"{
            "eventCapacity": 16,
            "reregisterExpiredPush": false,
            "queueLabel": "devices"
        }"#;
        let config = ConstellationConfig::from_json(json).unwrap();

        assert_eq!(
            config,
            ConstellationConfig::new()
                .with_event_capacity(16)
                .with_reregister_expired_push(false)
                .with_queue_label("devices")
        );
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let result = ConstellationConfig::from_json(r#"{"pollInterval": 5}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn from_json_rejects_invalid_document() {
        assert!(ConstellationConfig::from_json("not json").is_err());
    }
}

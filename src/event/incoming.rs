// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events delivered to the local device.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const TAB_RECEIVED: &str = "tabReceived";
const UNKNOWN: &str = "unknown";

/// One page of a received tab's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHistoryEntry {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
}

impl TabHistoryEntry {
    /// Creates a history entry.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// An event delivered to this device, either by polling or by push.
///
/// The same event can arrive through both paths; consumers must tolerate
/// duplicates.
///
/// Any `type` other than `tabReceived` decodes to
/// [`Unknown`](Self::Unknown) carrying that tag, so one unrecognised entry
/// never fails a whole batch.
///
/// # Examples
///
/// ```
/// use constellation_lib::event::{DeviceEventIncoming, TabHistoryEntry};
///
/// let event = DeviceEventIncoming::TabReceived {
///     sender: Some("device-7".to_string()),
///     entries: vec![TabHistoryEntry::new("Example", "https://example.com")],
/// };
///
/// assert_eq!(event.current_tab().map(|t| t.url.as_str()), Some("https://example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum DeviceEventIncoming {
    /// Another device sent a tab.
    #[serde(rename_all = "camelCase")]
    TabReceived {
        /// ID of the sending device, when the server disclosed it.
        sender: Option<String>,
        /// History of the tab; the last entry is the page to open.
        entries: Vec<TabHistoryEntry>,
    },

    /// A command this crate does not interpret.
    Unknown {
        /// The command name as sent by the server.
        command: String,
    },
}

impl DeviceEventIncoming {
    /// Creates a tab-received event holding a single page.
    #[must_use]
    pub fn tab_received(
        sender: Option<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::TabReceived {
            sender,
            entries: vec![TabHistoryEntry::new(title, url)],
        }
    }

    /// Returns the page to open for a received tab.
    #[must_use]
    pub fn current_tab(&self) -> Option<&TabHistoryEntry> {
        match self {
            Self::TabReceived { entries, .. } => entries.last(),
            Self::Unknown { .. } => None,
        }
    }

    /// Returns the sender's device ID, if known.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        match self {
            Self::TabReceived { sender, .. } => sender.as_deref(),
            Self::Unknown { .. } => None,
        }
    }
}

impl<'de> Deserialize<'de> for DeviceEventIncoming {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TabReceivedFields {
            #[serde(default)]
            sender: Option<String>,
            entries: Vec<TabHistoryEntry>,
        }

        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let tag = match object.remove("type") {
            Some(Value::String(tag)) => tag,
            Some(_) => return Err(D::Error::custom("event type must be a string")),
            None => return Err(D::Error::missing_field("type")),
        };

        if tag == TAB_RECEIVED {
            let fields: TabReceivedFields =
                serde_json::from_value(Value::Object(object)).map_err(D::Error::custom)?;
            return Ok(Self::TabReceived {
                sender: fields.sender,
                entries: fields.entries,
            });
        }

        // Our own serialized form carries the command next to the tag
        let command = match object.remove("command") {
            Some(Value::String(command)) if tag == UNKNOWN => command,
            _ => tag,
        };
        Ok(Self::Unknown { command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_tab_is_last_entry() {
        let event = DeviceEventIncoming::TabReceived {
            sender: None,
            entries: vec![
                TabHistoryEntry::new("Back", "https://example.com/1"),
                TabHistoryEntry::new("Now", "https://example.com/2"),
            ],
        };

        assert_eq!(event.current_tab().unwrap().title, "Now");
        assert_eq!(event.sender(), None);
    }

    #[test]
    fn unknown_command_has_no_tab() {
        let event = DeviceEventIncoming::Unknown {
            command: "ring".to_string(),
        };
        assert!(event.current_tab().is_none());
    }

    #[test]
    fn deserialize_tagged() {
        let json = r#"{
            "type": "tabReceived",
            "sender": "device-1",
            "entries": [{"title": "T", "url": "https://example.com"}]
        }"#;
        let event: DeviceEventIncoming = serde_json::from_str(json).unwrap();
        let sender = Some("device-1".to_string());
        let expected = DeviceEventIncoming::tab_received(sender, "T", "https://example.com");
        assert_eq!(event, expected);
    }

    #[test]
    fn unrecognised_type_decodes_to_unknown() {
        let event: DeviceEventIncoming = serde_json::from_str(r#"{"type":"ring"}"#).unwrap();
        assert_eq!(
            event,
            DeviceEventIncoming::Unknown {
                command: "ring".to_string()
            }
        );
    }

    #[test]
    fn unrecognised_entry_does_not_fail_batch() {
        let json = r#"[
            {"type": "tabReceived", "entries": [{"title": "T", "url": "https://example.com"}]},
            {"type": "closeTabs", "urls": ["https://example.com/old"]}
        ]"#;
        let events: Vec<DeviceEventIncoming> = serde_json::from_str(json).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].current_tab().unwrap().url, "https://example.com");
        assert_eq!(events[0].sender(), None);
        assert_eq!(
            events[1],
            DeviceEventIncoming::Unknown {
                command: "closeTabs".to_string()
            }
        );
    }

    #[test]
    fn unknown_survives_reserialization() {
        let event = DeviceEventIncoming::Unknown {
            command: "ring".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: DeviceEventIncoming = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn tab_received_still_requires_entries() {
        let result = serde_json::from_str::<DeviceEventIncoming>(r#"{"type":"tabReceived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_type_is_rejected() {
        let result = serde_json::from_str::<DeviceEventIncoming>(r#"{"command":"ring"}"#);
        assert!(result.is_err());
    }
}

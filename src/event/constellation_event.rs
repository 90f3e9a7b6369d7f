// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Announcements published by the constellation.

use std::sync::Arc;

use crate::error::OperationFailure;
use crate::state::ConstellationState;

/// Event name under which new snapshots are announced.
pub const STATE_UPDATE_EVENT: &str = "constellationStateUpdate";

/// Event name for expired push subscriptions.
pub const PUSH_SUBSCRIPTION_EXPIRED_EVENT: &str = "constellationPushSubscriptionExpired";

/// Event name for failures of best-effort operations.
pub const OPERATION_FAILED_EVENT: &str = "constellationOperationFailed";

/// Events announced to notifiers.
///
/// Every event is delivered on the main queue, never on the work queue that
/// produced it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use constellation_lib::event::{ConstellationEvent, STATE_UPDATE_EVENT};
/// use constellation_lib::state::ConstellationState;
///
/// let event = ConstellationEvent::StateUpdated(Arc::new(ConstellationState::default()));
/// assert_eq!(event.name(), STATE_UPDATE_EVENT);
/// assert!(event.state().is_some());
/// ```
#[derive(Debug, Clone)]
pub enum ConstellationEvent {
    /// A refresh completed and produced a new snapshot.
    ///
    /// Fired exactly once per successful refresh.
    StateUpdated(Arc<ConstellationState>),

    /// The server reported the local device's push subscription as expired.
    PushSubscriptionExpired {
        /// ID of the local device.
        device_id: String,
    },

    /// A best-effort operation failed.
    OperationFailed(OperationFailure),
}

impl ConstellationEvent {
    /// Returns the fixed name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StateUpdated(_) => STATE_UPDATE_EVENT,
            Self::PushSubscriptionExpired { .. } => PUSH_SUBSCRIPTION_EXPIRED_EVENT,
            Self::OperationFailed(_) => OPERATION_FAILED_EVENT,
        }
    }

    /// Returns the snapshot carried by a state update.
    #[must_use]
    pub fn state(&self) -> Option<&Arc<ConstellationState>> {
        match self {
            Self::StateUpdated(state) => Some(state),
            _ => None,
        }
    }

    /// Returns `true` if this is a state update.
    #[must_use]
    pub fn is_state_update(&self) -> bool {
        matches!(self, Self::StateUpdated(_))
    }

    /// Returns `true` if this reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::OperationFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AccountError, Operation};

    #[test]
    fn names_are_fixed() {
        let expired = ConstellationEvent::PushSubscriptionExpired {
            device_id: "me".to_string(),
        };
        assert_eq!(expired.name(), PUSH_SUBSCRIPTION_EXPIRED_EVENT);

        let failed = ConstellationEvent::OperationFailed(OperationFailure::new(
            Operation::Refresh,
            AccountError::Network("down".to_string()),
        ));
        assert_eq!(failed.name(), OPERATION_FAILED_EVENT);
        assert!(failed.is_failure());
        assert!(!failed.is_state_update());
        assert!(failed.state().is_none());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the constellation library.
//!
//! Failures are split in two tiers:
//!
//! - Result-yielding operations (polling and push payload decoding) hand an
//!   [`Error`] back to their caller.
//! - Best-effort operations (refresh, rename, sends, capability and push
//!   registration) never return an error. They log and publish an
//!   [`OperationFailure`] to the failure observers instead.

use std::fmt;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The account layer failed. The original failure is kept unchanged.
    #[error("internal account error: {0}")]
    InternalAccount(#[from] AccountError),

    /// A configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A default work queue was requested outside of a tokio runtime.
    #[error("no tokio runtime available to host the work queue")]
    NoRuntime,

    /// The queue was shut down before the operation produced a result.
    #[error("work queue closed before the operation completed")]
    QueueClosed,
}

impl Error {
    /// Returns the underlying account error, if this is an account failure.
    #[must_use]
    pub fn account_error(&self) -> Option<&AccountError> {
        match self {
            Self::InternalAccount(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors reported by an [`AccountClient`](crate::account::AccountClient).
///
/// The account layer performs no retries, so every variant reaches this
/// crate exactly as the server or transport reported it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The request could not reach the account service.
    #[error("network error: {0}")]
    Network(String),

    /// The session is not (or no longer) authorized.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The target device is not part of the constellation.
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    /// The target device does not support the requested command.
    #[error("device {0} does not support this command")]
    UnsupportedCommand(String),

    /// A push payload could not be decoded into device events.
    #[error("malformed push payload: {0}")]
    MalformedPayload(String),

    /// Any other failure of the account layer.
    #[error("{0}")]
    Other(String),
}

impl AccountError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedPayload(_) => FailureKind::DecodeFailure,
            Self::Network(_)
            | Self::Authentication(_)
            | Self::UnknownDevice(_)
            | Self::UnsupportedCommand(_)
            | Self::Other(_) => FailureKind::TransientAccountFailure,
        }
    }

    /// Returns `true` if retrying later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind(), FailureKind::TransientAccountFailure)
    }

    /// Returns `true` if a push payload was rejected as malformed.
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self.kind(), FailureKind::DecodeFailure)
    }
}

/// Failure categories callers can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network or authentication failure, recoverable by a later retry.
    TransientAccountFailure,
    /// A push payload that cannot be decoded.
    DecodeFailure,
}

/// Best-effort operations whose failures are reported instead of returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetching the device list.
    Refresh,
    /// Renaming the local device.
    SetDisplayName,
    /// Registering the local device.
    InitializeDevice,
    /// Synchronizing the local device's capabilities.
    EnsureCapabilities,
    /// Sending an event to another device.
    SendEvent,
    /// Registering push transport credentials.
    SetPushSubscription,
}

impl Operation {
    /// Returns the operation name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::SetDisplayName => "set_display_name",
            Self::InitializeDevice => "initialize_device",
            Self::EnsureCapabilities => "ensure_capabilities",
            Self::SendEvent => "send_event",
            Self::SetPushSubscription => "set_push_subscription",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A degraded failure of a best-effort operation.
///
/// The constellation stays usable after such a failure; it is observable
/// through logs and the failure observers only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {error}")]
pub struct OperationFailure {
    /// The operation that failed.
    pub operation: Operation,
    /// The account error that caused the failure.
    pub error: AccountError,
}

impl OperationFailure {
    /// Creates a new failure report.
    #[must_use]
    pub fn new(operation: Operation, error: AccountError) -> Self {
        Self { operation, error }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_is_decode_failure() {
        let err = AccountError::MalformedPayload("bad base64".to_string());
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
        assert!(err.is_decode_failure());
        assert!(!err.is_transient());
    }

    #[test]
    fn network_failure_is_transient() {
        let err = AccountError::Network("connection reset".to_string());
        assert!(err.is_transient());
        assert!(!err.is_decode_failure());
    }

    #[test]
    fn error_from_account_error_keeps_identity() {
        let account_err = AccountError::Authentication("token expired".to_string());
        let err: Error = account_err.clone().into();
        assert!(matches!(err, Error::InternalAccount(_)));
        assert_eq!(err.account_error(), Some(&account_err));
    }

    #[test]
    fn error_display() {
        let err = Error::from(AccountError::UnknownDevice("device-42".to_string()));
        assert_eq!(
            err.to_string(),
            "internal account error: unknown device: device-42"
        );
    }

    #[test]
    fn operation_failure_display() {
        let failure = OperationFailure::new(
            Operation::SendEvent,
            AccountError::Network("timeout".to_string()),
        );
        assert_eq!(failure.to_string(), "send_event failed: network error: timeout");
    }
}

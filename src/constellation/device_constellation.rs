// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device constellation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, oneshot};

use crate::account::AccountClient;
use crate::device::DevicePushSubscription;
use crate::error::{AccountError, Error, Operation, OperationFailure, Result};
use crate::event::{ConstellationEvent, DeviceEventIncoming, DeviceEventOutgoing, EventBus};
use crate::queue::{WorkQueue, barrier};
use crate::state::ConstellationState;
use crate::subscription::{CallbackRegistry, Notifier, Subscribable, SubscriptionId};
use crate::types::{Capabilities, DeviceType};

use super::builder::DeviceConstellationBuilder;
use super::config::ConstellationConfig;
use super::diagnostics::{Diagnostics, DiagnosticsSnapshot};

/// Result delivered to poll and push callbacks.
pub type EventsResult = Result<Vec<DeviceEventIncoming>>;

/// The account's device constellation, as seen from the local device.
///
/// Holds the latest [`ConstellationState`] and runs every account operation
/// as a job on its work queue, one at a time and in submission order.
/// Observers are notified from the main queue.
///
/// Cloning is cheap and every clone shares the same state and queues.
///
/// # Error contract
///
/// - [`poll_for_events`](Self::poll_for_events) and
///   [`process_raw_incoming_device_event`](Self::process_raw_incoming_device_event)
///   always deliver an explicit [`Error::InternalAccount`] on failure.
/// - Every other operation is best-effort: failures are logged, counted and
///   published as [`OperationFailure`]s, and the held snapshot stays usable.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use constellation_lib::account::AccountClient;
/// use constellation_lib::constellation::DeviceConstellation;
/// use constellation_lib::event::DeviceEventOutgoing;
///
/// # async fn example(account: Arc<dyn AccountClient>) -> constellation_lib::Result<()> {
/// let constellation = DeviceConstellation::new(account)?;
///
/// constellation.refresh();
/// constellation.flush().await;
///
/// if let Some(state) = constellation.state() {
///     for device in state.remote_devices() {
///         constellation.send_event_to_device(
///             &device.id,
///             DeviceEventOutgoing::send_tab("Example", "https://example.com"),
///         );
///     }
/// }
///
/// for event in constellation.poll_events().await? {
///     println!("received {event:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DeviceConstellation {
    inner: Arc<Inner>,
}

struct Inner {
    account: Arc<dyn AccountClient>,
    config: ConstellationConfig,
    /// The held snapshot, replaced as a whole.
    snapshot: RwLock<HeldSnapshot>,
    /// Sequence of the most recently started refresh.
    refresh_sequence: AtomicU64,
    /// Last push subscription handed to `set_device_push_subscription`.
    push_subscription: Mutex<Option<DevicePushSubscription>>,
    work_queue: Arc<dyn WorkQueue>,
    main_queue: Arc<dyn WorkQueue>,
    callbacks: Arc<CallbackRegistry>,
    event_bus: EventBus,
    notifiers: Arc<[Arc<dyn Notifier>]>,
    diagnostics: Diagnostics,
}

#[derive(Default)]
struct HeldSnapshot {
    sequence: u64,
    state: Option<Arc<ConstellationState>>,
}

impl DeviceConstellation {
    /// Creates a constellation with default configuration and queues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] if called outside of a tokio runtime.
    pub fn new(account: Arc<dyn AccountClient>) -> Result<Self> {
        Self::builder(account).build()
    }

    /// Starts building a constellation.
    #[must_use]
    pub fn builder(account: Arc<dyn AccountClient>) -> DeviceConstellationBuilder {
        DeviceConstellationBuilder::new(account)
    }

    pub(crate) fn from_parts(
        account: Arc<dyn AccountClient>,
        config: ConstellationConfig,
        work_queue: Arc<dyn WorkQueue>,
        main_queue: Arc<dyn WorkQueue>,
        extra_notifiers: Vec<Arc<dyn Notifier>>,
    ) -> Self {
        let callbacks = Arc::new(CallbackRegistry::new());
        let event_bus = EventBus::with_capacity(config.event_capacity);

        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::with_capacity(extra_notifiers.len() + 2);
        notifiers.push(Arc::clone(&callbacks) as Arc<dyn Notifier>);
        notifiers.push(Arc::new(event_bus.clone()));
        notifiers.extend(extra_notifiers);

        Self {
            inner: Arc::new(Inner {
                account,
                config,
                snapshot: RwLock::new(HeldSnapshot::default()),
                refresh_sequence: AtomicU64::new(0),
                push_subscription: Mutex::new(None),
                work_queue,
                main_queue,
                callbacks,
                event_bus,
                notifiers: notifiers.into(),
                diagnostics: Diagnostics::default(),
            }),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the held snapshot, or `None` if no refresh succeeded yet.
    ///
    /// Never blocks on I/O and never triggers any.
    #[must_use]
    pub fn state(&self) -> Option<Arc<ConstellationState>> {
        self.inner.snapshot.read().state.clone()
    }

    /// Fetches the device list and replaces the held snapshot.
    ///
    /// Fire-and-forget. On failure the held snapshot is kept and the failure
    /// is reported to the failure observers.
    pub fn refresh(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .work_queue
            .submit(Box::new(move || inner.refresh_now()));
    }

    /// Same as [`refresh`](Self::refresh).
    pub fn refresh_state(&self) {
        self.refresh();
    }

    // =========================================================================
    // Local device
    // =========================================================================

    /// Renames the local device, then refreshes.
    ///
    /// The refresh runs even if the rename failed, so the snapshot reflects
    /// whatever the server holds.
    pub fn set_local_device_name(&self, name: impl Into<String>) {
        let name = name.into();
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            match inner.account.set_device_display_name(&name) {
                Ok(()) => tracing::debug!(name = %name, "Local device renamed"),
                Err(error) => inner.report_failure(Operation::SetDisplayName, error),
            }
            inner.refresh_now();
        }));
    }

    /// Registers the local device with the account service.
    pub fn init_device(
        &self,
        name: impl Into<String>,
        device_type: DeviceType,
        capabilities: Capabilities,
    ) {
        let name = name.into();
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            match inner
                .account
                .initialize_device(&name, device_type, &capabilities)
            {
                Ok(()) => tracing::debug!(name = %name, %device_type, "Local device initialized"),
                Err(error) => inner.report_failure(Operation::InitializeDevice, error),
            }
        }));
    }

    /// Makes the server's view of the local device's capabilities match.
    pub fn ensure_capabilities(&self, capabilities: Capabilities) {
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            match inner.account.ensure_capabilities(&capabilities) {
                Ok(()) => tracing::debug!(count = capabilities.len(), "Capabilities ensured"),
                Err(error) => inner.report_failure(Operation::EnsureCapabilities, error),
            }
        }));
    }

    // =========================================================================
    // Outgoing events
    // =========================================================================

    /// Sends an event to another device.
    ///
    /// Best-effort: no delivery confirmation, failures are reported to the
    /// failure observers only.
    pub fn send_event_to_device(
        &self,
        target_device_id: impl Into<String>,
        event: DeviceEventOutgoing,
    ) {
        let target = target_device_id.into();
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            let result = match &event {
                DeviceEventOutgoing::SendTab { title, url } => {
                    inner.account.send_event(&target, title, url)
                }
            };
            match result {
                Ok(()) => tracing::debug!(target_device = %target, "Event sent"),
                Err(error) => inner.report_failure(Operation::SendEvent, error),
            }
        }));
    }

    // =========================================================================
    // Incoming events
    // =========================================================================

    /// Fetches events queued for this device since the last poll.
    ///
    /// The callback runs on the main queue with the events in server order,
    /// or with [`Error::InternalAccount`] wrapping the account failure.
    pub fn poll_for_events<F>(&self, callback: F)
    where
        F: FnOnce(EventsResult) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            let result = inner
                .account
                .poll_device_commands()
                .map_err(|error| result_failure("poll_device_commands", error));
            if let Ok(events) = &result {
                tracing::debug!(count = events.len(), "Polled device commands");
            }
            inner.deliver(callback, result);
        }));
    }

    /// Async form of [`poll_for_events`](Self::poll_for_events).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InternalAccount`] if polling failed, or
    /// [`Error::QueueClosed`] if the queues dropped the operation.
    pub async fn poll_events(&self) -> EventsResult {
        let (tx, rx) = oneshot::channel();
        self.poll_for_events(move |result| {
            let _ = tx.send(result);
        });
        rx.await.map_err(|_| Error::QueueClosed)?
    }

    /// Decodes a push payload into device events.
    ///
    /// The payload is passed to the account client untouched. The callback
    /// contract matches [`poll_for_events`](Self::poll_for_events); a
    /// malformed payload yields [`Error::InternalAccount`] wrapping
    /// [`AccountError::MalformedPayload`].
    pub fn process_raw_incoming_device_event<F>(&self, payload: impl Into<String>, callback: F)
    where
        F: FnOnce(EventsResult) + Send + 'static,
    {
        let payload = payload.into();
        let inner = Arc::clone(&self.inner);
        self.inner.work_queue.submit(Box::new(move || {
            let result = inner
                .account
                .handle_push_message(&payload)
                .map_err(|error| result_failure("handle_push_message", error));
            if let Ok(events) = &result {
                tracing::debug!(count = events.len(), "Decoded push payload");
            }
            inner.deliver(callback, result);
        }));
    }

    /// Async form of
    /// [`process_raw_incoming_device_event`](Self::process_raw_incoming_device_event).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InternalAccount`] if decoding failed, or
    /// [`Error::QueueClosed`] if the queues dropped the operation.
    pub async fn process_push_payload(&self, payload: impl Into<String>) -> EventsResult {
        let (tx, rx) = oneshot::channel();
        self.process_raw_incoming_device_event(payload, move |result| {
            let _ = tx.send(result);
        });
        rx.await.map_err(|_| Error::QueueClosed)?
    }

    /// Registers push transport credentials right away, on the caller.
    ///
    /// The subscription is remembered even if registration fails, so it can
    /// be re-registered when a refresh reports it as expired. Does not
    /// trigger a refresh.
    ///
    /// # Blocking
    ///
    /// Calls [`AccountClient::set_device_push_subscription`] on the calling
    /// thread while holding the subscription lock, and may also wait for a
    /// re-registration running on the work queue. From async code, call it
    /// inside [`tokio::task::spawn_blocking`] so no runtime worker is blocked.
    pub fn set_device_push_subscription(&self, subscription: DevicePushSubscription) {
        let result = {
            let mut stored = self.inner.push_subscription.lock();
            let result = self
                .inner
                .account
                .set_device_push_subscription(&subscription);
            *stored = Some(subscription);
            result
        };

        match result {
            Ok(()) => tracing::debug!("Push subscription registered"),
            Err(error) => self
                .inner
                .report_failure(Operation::SetPushSubscription, error),
        }
    }

    /// Returns the last push subscription handed to
    /// [`set_device_push_subscription`](Self::set_device_push_subscription).
    #[must_use]
    pub fn push_subscription(&self) -> Option<DevicePushSubscription> {
        self.inner.push_subscription.lock().clone()
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Subscribes to every announcement through a broadcast channel.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConstellationEvent> {
        self.inner.event_bus.subscribe()
    }

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.inner.callbacks
    }

    /// Returns the current counters.
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.inner.diagnostics.snapshot()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ConstellationConfig {
        &self.inner.config
    }

    /// Waits until every operation submitted before this call has run and
    /// its announcements and callbacks have been delivered.
    pub async fn flush(&self) {
        if !barrier(self.inner.work_queue.as_ref()).await {
            tracing::warn!("Work queue closed while flushing");
        }
        if !barrier(self.inner.main_queue.as_ref()).await {
            tracing::warn!("Main queue closed while flushing");
        }
    }
}

impl Inner {
    /// Runs one refresh on the calling (work queue) thread.
    fn refresh_now(&self) {
        let sequence = self.refresh_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let devices = match self.account.fetch_devices() {
            Ok(devices) => devices,
            Err(error) => {
                self.diagnostics.record_refresh_failed();
                self.report_failure(Operation::Refresh, error);
                return;
            }
        };

        let current_count = devices.iter().filter(|d| d.is_current_device).count();
        if current_count > 1 {
            self.diagnostics.record_multiple_local_devices();
            tracing::warn!(
                count = current_count,
                "Account reported several current devices, keeping the first"
            );
        }

        let state = Arc::new(ConstellationState::from_devices(devices));

        {
            let mut held = self.snapshot.write();
            // A refresh that started later has already been applied
            if sequence <= held.sequence {
                self.diagnostics.record_stale_refresh();
                tracing::debug!(sequence, applied = held.sequence, "Discarding stale refresh");
                return;
            }
            held.sequence = sequence;
            held.state = Some(Arc::clone(&state));
        }

        self.diagnostics.record_refresh_succeeded();
        tracing::debug!(
            sequence,
            local_device = ?state.local_device().map(|d| d.id.as_str()),
            remote_devices = state.remote_devices().len(),
            "Constellation refreshed"
        );

        let expired_device = state
            .local_device()
            .filter(|d| d.push_subscription_expired)
            .map(|d| d.id.clone());

        self.announce(ConstellationEvent::StateUpdated(state));

        if let Some(device_id) = expired_device {
            self.handle_expired_push_subscription(device_id);
        }
    }

    fn handle_expired_push_subscription(&self, device_id: String) {
        tracing::warn!(device_id = %device_id, "Push subscription expired");
        self.diagnostics.record_push_subscription_expired();
        self.announce(ConstellationEvent::PushSubscriptionExpired {
            device_id: device_id.clone(),
        });

        if !self.config.reregister_expired_push {
            return;
        }

        let result = {
            let stored = self.push_subscription.lock();
            let Some(subscription) = stored.as_ref() else {
                tracing::debug!(device_id = %device_id, "No push subscription to re-register");
                return;
            };
            self.account.set_device_push_subscription(subscription)
        };

        match result {
            Ok(()) => tracing::debug!(device_id = %device_id, "Push subscription re-registered"),
            Err(error) => self.report_failure(Operation::SetPushSubscription, error),
        }
    }

    /// Logs, counts and announces a degraded failure.
    fn report_failure(&self, operation: Operation, error: AccountError) {
        tracing::warn!(%operation, %error, kind = ?error.kind(), "Account operation failed");
        self.diagnostics.record_degraded_failure();
        self.announce(ConstellationEvent::OperationFailed(OperationFailure::new(
            operation, error,
        )));
    }

    fn announce(&self, event: ConstellationEvent) {
        let notifiers = Arc::clone(&self.notifiers);
        self.main_queue.submit(Box::new(move || {
            for notifier in notifiers.iter() {
                notifier.notify(&event);
            }
        }));
    }

    fn deliver<F>(&self, callback: F, result: EventsResult)
    where
        F: FnOnce(EventsResult) + Send + 'static,
    {
        self.main_queue.submit(Box::new(move || callback(result)));
    }
}

/// Logs a failure that is handed back to the caller.
fn result_failure(call: &'static str, error: AccountError) -> Error {
    tracing::warn!(call, %error, kind = ?error.kind(), "Account call failed");
    Error::InternalAccount(error)
}

impl Subscribable for DeviceConstellation {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Arc<ConstellationState>) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_changed(callback)
    }

    fn on_operation_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OperationFailure) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_operation_failed(callback)
    }

    fn on_push_subscription_expired<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_push_subscription_expired(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}

impl fmt::Debug for DeviceConstellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = self.inner.snapshot.read();
        f.debug_struct("DeviceConstellation")
            .field("config", &self.inner.config)
            .field("sequence", &held.sequence)
            .field("state", &held.state)
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}

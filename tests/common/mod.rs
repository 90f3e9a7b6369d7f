// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted account client shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use constellation_lib::account::AccountClient;
use constellation_lib::device::{Device, DevicePushSubscription};
use constellation_lib::error::AccountError;
use constellation_lib::event::DeviceEventIncoming;
use constellation_lib::queue::{Job, WorkQueue};
use constellation_lib::types::{Capabilities, DeviceType};

/// A call made to the mock account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchDevices,
    SetDisplayName(String),
    InitializeDevice {
        name: String,
        device_type: DeviceType,
        capabilities: Capabilities,
    },
    EnsureCapabilities(Capabilities),
    SendEvent {
        target: String,
        title: String,
        url: String,
    },
    PollDeviceCommands,
    SetPushSubscription(DevicePushSubscription),
    HandlePushMessage(String),
}

/// Account methods that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    FetchDevices,
    SetDisplayName,
    InitializeDevice,
    EnsureCapabilities,
    SendEvent,
    PollDeviceCommands,
    SetPushSubscription,
    HandlePushMessage,
}

/// In-memory account service.
///
/// Push payloads are JSON arrays of [`DeviceEventIncoming`]; anything else is
/// rejected as malformed.
#[derive(Default)]
pub struct MockAccount {
    calls: Mutex<Vec<Call>>,
    devices: Mutex<Vec<Device>>,
    pending_commands: Mutex<Vec<DeviceEventIncoming>>,
    failures: Mutex<HashMap<Method, AccountError>>,
    fetch_gate: Mutex<Option<ArmedGate>>,
}

struct ArmedGate {
    entered: mpsc::Sender<()>,
    release: mpsc::Receiver<()>,
}

/// Test side of a gated `fetch_devices` call.
pub struct FetchGate {
    entered: mpsc::Receiver<()>,
    release: mpsc::Sender<()>,
}

impl FetchGate {
    /// Blocks until the gated fetch has read the device list.
    pub fn wait_entered(&self) {
        self.entered.recv().unwrap();
    }

    /// Lets the gated fetch return.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

impl MockAccount {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_devices(devices: Vec<Device>) -> Arc<Self> {
        let account = Self::new();
        account.set_devices(devices);
        account
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.lock() = devices;
    }

    pub fn queue_command(&self, event: DeviceEventIncoming) {
        self.pending_commands.lock().push(event);
    }

    /// Makes every later call of `method` fail with `error`.
    pub fn fail(&self, method: Method, error: AccountError) {
        self.failures.lock().insert(method, error);
    }

    /// Makes the next `fetch_devices` call read the device list, then wait
    /// until the returned gate is released.
    pub fn gate_next_fetch(&self) -> FetchGate {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.fetch_gate.lock() = Some(ArmedGate {
            entered: entered_tx,
            release: release_rx,
        });
        FetchGate {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub fn recover(&self, method: Method) {
        self.failures.lock().remove(&method);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call, method: Method) -> Result<(), AccountError> {
        self.calls.lock().push(call);
        match self.failures.lock().get(&method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl AccountClient for MockAccount {
    fn fetch_devices(&self) -> Result<Vec<Device>, AccountError> {
        self.record(Call::FetchDevices, Method::FetchDevices)?;
        let devices = self.devices.lock().clone();

        let gate = self.fetch_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.recv();
        }
        Ok(devices)
    }

    fn set_device_display_name(&self, name: &str) -> Result<(), AccountError> {
        self.record(Call::SetDisplayName(name.to_string()), Method::SetDisplayName)?;
        for device in self.devices.lock().iter_mut() {
            if device.is_current_device {
                device.display_name = name.to_string();
            }
        }
        Ok(())
    }

    fn initialize_device(
        &self,
        name: &str,
        device_type: DeviceType,
        capabilities: &Capabilities,
    ) -> Result<(), AccountError> {
        self.record(
            Call::InitializeDevice {
                name: name.to_string(),
                device_type,
                capabilities: capabilities.clone(),
            },
            Method::InitializeDevice,
        )
    }

    fn ensure_capabilities(&self, capabilities: &Capabilities) -> Result<(), AccountError> {
        self.record(
            Call::EnsureCapabilities(capabilities.clone()),
            Method::EnsureCapabilities,
        )
    }

    fn send_event(
        &self,
        target_device_id: &str,
        title: &str,
        url: &str,
    ) -> Result<(), AccountError> {
        self.record(
            Call::SendEvent {
                target: target_device_id.to_string(),
                title: title.to_string(),
                url: url.to_string(),
            },
            Method::SendEvent,
        )
    }

    fn poll_device_commands(&self) -> Result<Vec<DeviceEventIncoming>, AccountError> {
        self.record(Call::PollDeviceCommands, Method::PollDeviceCommands)?;
        Ok(std::mem::take(&mut *self.pending_commands.lock()))
    }

    fn set_device_push_subscription(
        &self,
        subscription: &DevicePushSubscription,
    ) -> Result<(), AccountError> {
        self.record(
            Call::SetPushSubscription(subscription.clone()),
            Method::SetPushSubscription,
        )
    }

    fn handle_push_message(&self, payload: &str) -> Result<Vec<DeviceEventIncoming>, AccountError> {
        self.record(
            Call::HandlePushMessage(payload.to_string()),
            Method::HandlePushMessage,
        )?;
        serde_json::from_str(payload).map_err(|e| AccountError::MalformedPayload(e.to_string()))
    }
}

/// A queue that holds jobs until the test runs them.
#[derive(Default)]
pub struct DeferredQueue {
    jobs: Mutex<Vec<Job>>,
}

impl DeferredQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Runs the held jobs in submission order. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let jobs = std::mem::take(&mut *self.jobs.lock());
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

impl WorkQueue for DeferredQueue {
    fn submit(&self, job: Job) {
        self.jobs.lock().push(job);
    }
}

/// A queue that runs every job on its own thread, so jobs may overlap.
#[derive(Default)]
pub struct ThreadQueue {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Waits for the most recently submitted job.
    pub fn join_last(&self) {
        let handle = self.handles.lock().pop();
        if let Some(handle) = handle {
            handle.join().unwrap();
        }
    }

    /// Waits for every submitted job.
    pub fn join_all(&self) {
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            handle.join().unwrap();
        }
    }
}

impl WorkQueue for ThreadQueue {
    fn submit(&self, job: Job) {
        self.handles.lock().push(std::thread::spawn(job));
    }
}

pub fn local(id: &str, name: &str) -> Device {
    Device::new(id, name, DeviceType::Mobile).as_current_device()
}

pub fn remote(id: &str, name: &str) -> Device {
    Device::new(id, name, DeviceType::Desktop)
}

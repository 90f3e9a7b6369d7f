// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for [`DeviceConstellation`].

use std::fmt;
use std::sync::Arc;

use crate::account::AccountClient;
use crate::error::Result;
use crate::queue::{InlineQueue, SerialQueue, WorkQueue};
use crate::subscription::Notifier;

use super::{ConstellationConfig, DeviceConstellation};

/// Builder for a [`DeviceConstellation`].
///
/// Without explicit queues, `build` spawns two [`SerialQueue`]s on the
/// current tokio runtime: a blocking work queue for account calls and a main
/// queue for announcements.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use constellation_lib::account::AccountClient;
/// use constellation_lib::constellation::{ConstellationConfig, DeviceConstellation};
///
/// # fn example(account: Arc<dyn AccountClient>) -> constellation_lib::Result<()> {
/// let constellation = DeviceConstellation::builder(account)
///     .config(ConstellationConfig::new().with_queue_label("fxa-devices"))
///     .notifier(|event: &constellation_lib::event::ConstellationEvent| {
///         println!("{}", event.name());
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceConstellationBuilder {
    account: Arc<dyn AccountClient>,
    config: ConstellationConfig,
    work_queue: Option<Arc<dyn WorkQueue>>,
    main_queue: Option<Arc<dyn WorkQueue>>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl DeviceConstellationBuilder {
    pub(crate) fn new(account: Arc<dyn AccountClient>) -> Self {
        Self {
            account,
            config: ConstellationConfig::default(),
            work_queue: None,
            main_queue: None,
            notifiers: Vec::new(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ConstellationConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the queue running account operations.
    #[must_use]
    pub fn work_queue(mut self, queue: Arc<dyn WorkQueue>) -> Self {
        self.work_queue = Some(queue);
        self
    }

    /// Sets the queue delivering announcements and results.
    #[must_use]
    pub fn main_queue(mut self, queue: Arc<dyn WorkQueue>) -> Self {
        self.main_queue = Some(queue);
        self
    }

    /// Runs every operation synchronously on the caller.
    ///
    /// Installs an [`InlineQueue`] as both work and main queue. Intended for
    /// tests and for hosts without a tokio runtime.
    #[must_use]
    pub fn inline(self) -> Self {
        self.work_queue(Arc::new(InlineQueue))
            .main_queue(Arc::new(InlineQueue))
    }

    /// Adds a notifier next to the built-in callback registry and event bus.
    #[must_use]
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifiers.push(Arc::new(notifier));
        self
    }

    /// Adds a shared notifier.
    #[must_use]
    pub fn shared_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Builds the constellation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`](crate::Error::NoRuntime) if a default
    /// queue has to be spawned outside of a tokio runtime.
    pub fn build(self) -> Result<DeviceConstellation> {
        let work_queue: Arc<dyn WorkQueue> = match self.work_queue {
            Some(queue) => queue,
            None => Arc::new(SerialQueue::background(self.config.queue_label.clone())?),
        };
        let main_queue: Arc<dyn WorkQueue> = match self.main_queue {
            Some(queue) => queue,
            None => Arc::new(SerialQueue::main(format!(
                "{}-main",
                self.config.queue_label
            ))?),
        };

        Ok(DeviceConstellation::from_parts(
            self.account,
            self.config,
            work_queue,
            main_queue,
            self.notifiers,
        ))
    }
}

impl fmt::Debug for DeviceConstellationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConstellationBuilder")
            .field("config", &self.config)
            .field("custom_work_queue", &self.work_queue.is_some())
            .field("custom_main_queue", &self.main_queue.is_some())
            .field("notifiers", &self.notifiers.len())
            .finish_non_exhaustive()
    }
}

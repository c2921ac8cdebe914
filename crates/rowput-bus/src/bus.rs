// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide publish point for [`Changes`] events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rowput_core::Changes;
use tokio::sync::broadcast;
use tracing::debug;

use crate::subscription::ChangeSubscription;

/// Default number of events buffered per subscriber before it starts lagging.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for change notifications, backed by a tokio broadcast channel.
///
/// Cloning is cheap; all clones publish into the same channel. Publishing
/// never blocks and never fails: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<Changes>,
    published: Arc<AtomicU64>,
}

impl ChangeBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Hand `changes` to every current subscriber.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub fn notify_changes(&self, changes: Changes) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(changes) {
            Ok(receivers) => {
                debug!(receivers, "changes published");
                receivers
            }
            Err(broadcast::error::SendError(changes)) => {
                debug!(tables = ?changes.affected_tables(), "changes published with no subscribers");
                0
            }
        }
    }

    /// Subscribe to every change published from now on.
    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.sender.subscribe(), None)
    }

    /// Subscribe to changes touching at least one of `tables`.
    pub fn subscribe_to_tables<I, S>(&self, tables: I) -> ChangeSubscription
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = tables.into_iter().map(Into::into).collect();
        ChangeSubscription::new(self.sender.subscribe(), Some(filter))
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total number of events handed to the bus, delivered or not.
    pub fn changes_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("receivers", &self.receiver_count())
            .field("published", &self.changes_published())
            .finish()
    }
}

// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receiving side of the change bus.

use std::collections::BTreeSet;

use futures::Stream;
use rowput_core::Changes;
use tokio::sync::broadcast;
use tracing::warn;

/// A subscription to a [`ChangeBus`](crate::ChangeBus).
///
/// Slow subscribers skip the events they fell behind on (with a warning)
/// rather than blocking publishers. Dropping the subscription unsubscribes.
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<Changes>,
    tables: Option<BTreeSet<String>>,
}

impl ChangeSubscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<Changes>,
        tables: Option<BTreeSet<String>>,
    ) -> Self {
        Self { receiver, tables }
    }

    /// Receive the next matching event, waiting if necessary.
    ///
    /// Returns `None` once every bus handle has been dropped.
    pub async fn recv(&mut self) -> Option<Changes> {
        loop {
            match self.receiver.recv().await {
                Ok(changes) if self.matches(&changes) => return Some(changes),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "change subscriber lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive an already-published matching event without waiting.
    pub fn try_recv(&mut self) -> Option<Changes> {
        loop {
            match self.receiver.try_recv() {
                Ok(changes) if self.matches(&changes) => return Some(changes),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "change subscriber lagged, skipped events");
                }
                Err(_) => return None,
            }
        }
    }

    /// Consume the subscription as a stream of events.
    pub fn into_stream(self) -> impl Stream<Item = Changes> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|changes| (changes, sub))
        })
    }

    fn matches(&self, changes: &Changes) -> bool {
        match &self.tables {
            Some(tables) => tables.iter().any(|t| changes.affects(t)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use tracing_test::traced_test;

    use crate::ChangeBus;

    use super::*;

    fn changes(table: &str) -> Changes {
        Changes::new_instance(table).unwrap()
    }

    #[tokio::test]
    async fn table_filter_skips_unrelated_changes() {
        let bus = ChangeBus::new(16);
        let mut sub = bus.subscribe_to_tables(["users"]);

        bus.notify_changes(changes("posts"));
        bus.notify_changes(Changes::for_tables(["posts", "users"]).unwrap());

        let received = sub.recv().await.unwrap();
        assert!(received.affects("users"));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    #[traced_test]
    async fn lagging_subscriber_skips_to_latest() {
        let bus = ChangeBus::new(1);
        let mut sub = bus.subscribe();

        bus.notify_changes(changes("a"));
        bus.notify_changes(changes("b"));
        bus.notify_changes(changes("c"));

        assert_eq!(sub.recv().await, Some(changes("c")));
        assert!(logs_contain("lagged"));
    }

    #[tokio::test]
    async fn recv_returns_none_when_bus_dropped() {
        let bus = ChangeBus::new(4);
        let mut sub = bus.subscribe();
        drop(bus);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn stream_yields_published_changes() {
        let bus = ChangeBus::new(4);
        let stream = bus.subscribe().into_stream();

        bus.notify_changes(changes("users"));
        bus.notify_changes(changes("posts"));
        drop(bus);

        let all: Vec<Changes> = stream.collect().await;
        assert_eq!(all, vec![changes("users"), changes("posts")]);
    }
}

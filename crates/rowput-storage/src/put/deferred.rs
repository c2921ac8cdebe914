// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred execution of a prepared put on the tokio runtime.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use futures::stream::FusedStream;
use rowput_core::{PutResult, RowputError};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::debug;

use crate::put::prepared::PreparedPut;

/// A put that runs once per subscription.
///
/// Creating it writes nothing. Each [`subscribe`](Self::subscribe) runs the
/// full blocking put on the runtime's blocking pool; subscribing twice
/// writes twice.
pub struct DeferredPut<T> {
    prepared: PreparedPut<T>,
    runtime: Handle,
}

impl<T> Clone for DeferredPut<T> {
    fn clone(&self) -> Self {
        Self {
            prepared: self.prepared.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> DeferredPut<T> {
    pub(crate) fn new(prepared: PreparedPut<T>, runtime: Handle) -> Self {
        Self { prepared, runtime }
    }

    /// Start the put and return the stream its outcome is delivered on.
    ///
    /// Dropping the subscription cancels delivery only: a write that has
    /// started still runs to completion and still publishes its changes.
    pub fn subscribe(&self) -> PutSubscription {
        let (tx, rx) = oneshot::channel();
        let prepared = self.prepared.clone();
        self.runtime.spawn_blocking(move || {
            let outcome = prepared.execute_blocking();
            if tx.send(outcome).is_err() {
                debug!("put subscriber gone before delivery, outcome discarded");
            }
        });
        PutSubscription { receiver: Some(rx) }
    }

    /// Subscribe and wait for the single outcome.
    pub async fn execute(&self) -> Result<PutResult, RowputError> {
        self.subscribe().await
    }
}

/// Receiving end of one deferred put.
///
/// As a [`Stream`] it yields exactly one item (the result or the error) and
/// then ends. It can also be awaited directly for that item.
pub struct PutSubscription {
    receiver: Option<oneshot::Receiver<Result<PutResult, RowputError>>>,
}

impl PutSubscription {
    fn poll_outcome(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<PutResult, RowputError>>> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Poll::Ready(None);
        };
        let outcome = ready!(Pin::new(receiver).poll(cx));
        self.receiver = None;
        Poll::Ready(Some(outcome.unwrap_or_else(|_| {
            Err(RowputError::Internal(
                "deferred put ended without producing a result".to_string(),
            ))
        })))
    }
}

impl Stream for PutSubscription {
    type Item = Result<PutResult, RowputError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_outcome(cx)
    }
}

impl FusedStream for PutSubscription {
    fn is_terminated(&self) -> bool {
        self.receiver.is_none()
    }
}

impl Future for PutSubscription {
    type Output = Result<PutResult, RowputError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().poll_outcome(cx).map(|item| {
            item.unwrap_or_else(|| {
                Err(RowputError::Internal(
                    "put subscription polled after completion".to_string(),
                ))
            })
        })
    }
}

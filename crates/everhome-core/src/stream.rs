// ── Device subscriptions ──
//
// Consumers follow the device collection through a `DeviceStream`:
// point-in-time access plus change notification, or a `Stream` of
// snapshots for use with `StreamExt` combinators.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::DeviceCollection;

/// A subscription to the device collection.
pub struct DeviceStream {
    current: Arc<DeviceCollection>,
    receiver: watch::Receiver<Arc<DeviceCollection>>,
}

impl DeviceStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<DeviceCollection>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or by the last `changed()`.
    pub fn current(&self) -> &Arc<DeviceCollection> {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<DeviceCollection> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<DeviceCollection>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`. The first item is the current snapshot.
    pub fn into_stream(self) -> DeviceWatchStream {
        DeviceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot per collection replacement.
pub struct DeviceWatchStream {
    inner: WatchStream<Arc<DeviceCollection>>,
}

impl Stream for DeviceWatchStream {
    type Item = Arc<DeviceCollection>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

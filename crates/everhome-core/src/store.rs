// ── Reactive device store ──
//
// Holds the current collection behind a `watch` channel. A refresh swaps
// in a whole new collection; readers never see a partial one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Device, DeviceCollection};
use crate::stream::DeviceStream;

/// Current device collection plus the time it was fetched.
pub struct DeviceStore {
    devices: watch::Sender<Arc<DeviceCollection>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        let (devices, _) = watch::channel(Arc::new(DeviceCollection::empty()));
        let (last_refresh, _) = watch::channel(None);
        Self {
            devices,
            last_refresh,
        }
    }

    /// Replace the collection and stamp the refresh time.
    pub(crate) fn replace(&self, collection: DeviceCollection) {
        self.devices.send_replace(Arc::new(collection));
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    pub fn snapshot(&self) -> Arc<DeviceCollection> {
        self.devices.borrow().clone()
    }

    pub fn device(&self, id: &str) -> Option<Arc<Device>> {
        self.devices.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.devices.borrow().contains(id)
    }

    pub fn device_count(&self) -> usize {
        self.devices.borrow().len()
    }

    /// Time of the last successful refresh, `None` before the first.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn subscribe(&self) -> DeviceStream {
        DeviceStream::new(self.devices.subscribe())
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, DeviceState};
    use serde_json::Map;

    fn collection(ids: &[&str]) -> DeviceCollection {
        ids.iter()
            .map(|id| Device {
                id: DeviceId::from(*id),
                subtype: Some("socket".into()),
                name: None,
                model: None,
                firmware_version: None,
                position: None,
                capabilities: Vec::new(),
                state: DeviceState::default(),
                attributes: Map::new(),
            })
            .collect()
    }

    #[test]
    fn starts_empty() {
        let store = DeviceStore::new();
        assert!(store.snapshot().is_empty());
        assert!(store.last_refresh().is_none());
    }

    #[test]
    fn replace_swaps_whole_collection() {
        let store = DeviceStore::new();
        store.replace(collection(&["a", "b"]));
        let first = store.snapshot();

        store.replace(collection(&["c"]));
        assert_eq!(first.len(), 2);
        assert_eq!(store.device_count(), 1);
        assert!(store.contains("c"));
        assert!(store.device("a").is_none());
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = DeviceStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_empty());

        store.replace(collection(&["a"]));
        let snap = stream.changed().await.unwrap();
        assert!(snap.contains("a"));
        assert!(stream.current().contains("a"));
    }
}

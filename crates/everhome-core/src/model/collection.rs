// ── Immutable device collection ──

use std::collections::BTreeMap;
use std::sync::Arc;

use super::category::Category;
use super::device::{Device, DeviceId};

/// Snapshot of every device kept by the last successful fetch.
///
/// Replaced wholesale on each refresh and never mutated afterwards.
/// Iteration is ordered by device id.
#[derive(Debug, Clone, Default)]
pub struct DeviceCollection {
    devices: BTreeMap<DeviceId, Arc<Device>>,
}

impl DeviceCollection {
    /// An empty collection (the state before the first refresh).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Device>> {
        self.devices.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.devices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    /// Devices whose subtype belongs to `category`.
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &Arc<Device>> {
        self.iter().filter(move |d| d.category() == Some(category))
    }
}

/// Later devices replace earlier ones with the same id.
impl FromIterator<Device> for DeviceCollection {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        let devices = iter
            .into_iter()
            .map(|d| (d.id.clone(), Arc::new(d)))
            .collect();
        Self { devices }
    }
}

impl<'a> IntoIterator for &'a DeviceCollection {
    type Item = &'a Arc<Device>;
    type IntoIter = std::collections::btree_map::Values<'a, DeviceId, Arc<Device>>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.values()
    }
}

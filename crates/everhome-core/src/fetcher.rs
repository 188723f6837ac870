// ── Device fetcher ──
//
// One `GET /device` turned into a filtered, immutable collection.

use everhome_api::EverhomeClient;
use tracing::{debug, trace, warn};

use crate::error::CoreError;
use crate::model::{Device, DeviceCollection, SubtypeFilter};

/// Fetches the device list and keeps the subtypes on its allow-list.
///
/// The allow-list is a constructor input, so one fetcher type serves
/// every category.
#[derive(Debug, Clone)]
pub struct DeviceFetcher {
    client: EverhomeClient,
    filter: SubtypeFilter,
}

impl DeviceFetcher {
    pub fn new(client: EverhomeClient, filter: SubtypeFilter) -> Self {
        Self { client, filter }
    }

    pub fn filter(&self) -> &SubtypeFilter {
        &self.filter
    }

    /// Fetch and filter the device list.
    ///
    /// Records with a subtype outside the allow-list, or without an id,
    /// are left out. No partial collection is ever returned.
    pub async fn fetch(&self) -> Result<DeviceCollection, CoreError> {
        let records = self.client.list_devices().await?;
        let total = records.len();

        let devices: DeviceCollection = records
            .into_iter()
            .filter(|record| match record.subtype.as_deref() {
                Some(subtype) if self.filter.allows(subtype) => true,
                subtype => {
                    trace!(id = ?record.id, ?subtype, "skipping unsupported subtype");
                    false
                }
            })
            .filter_map(|record| match Device::try_from(record) {
                Ok(device) => Some(device),
                Err(e) => {
                    warn!(error = %e, "skipping device record");
                    None
                }
            })
            .collect();

        debug!(total, kept = devices.len(), "device fetch complete");
        Ok(devices)
    }
}

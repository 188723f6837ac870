// Device endpoints
//
// Listing via `GET /device` and command execution via
// `POST /device/{id}/execute`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::EverhomeClient;
use crate::error::Error;
use crate::models::DeviceRecord;

impl EverhomeClient {
    /// List every device on the account.
    ///
    /// `GET /device`. The body must be a JSON array; elements that are not
    /// objects are skipped with a warning rather than failing the listing.
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.url("device")?;
        let raw: Vec<Value> = self.get(url).await?;
        let total = raw.len();

        let records: Vec<DeviceRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index = idx, error = %e, "skipping malformed device record");
                    None
                }
            })
            .collect();

        debug!(total, decoded = records.len(), "listed devices");
        Ok(records)
    }

    /// Execute an action on a device.
    ///
    /// `POST /device/{id}/execute` with `{"action": action, ...params}`.
    /// The `action` key always wins over a same-named entry in `params`.
    pub async fn execute_action(
        &self,
        device_id: &str,
        action: &str,
        params: &Map<String, Value>,
    ) -> Result<(), Error> {
        let url = self.url_with_segments(&["device", device_id, "execute"])?;
        let body = action_body(action, params);
        debug!(device_id, action, "executing device action");
        self.post(url, &body).await
    }
}

/// Merge the action name into the parameter map.
pub(crate) fn action_body(action: &str, params: &Map<String, Value>) -> Value {
    let mut body = params.clone();
    body.insert("action".into(), Value::String(action.into()));
    Value::Object(body)
}

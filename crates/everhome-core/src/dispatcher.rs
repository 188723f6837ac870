// ── Action dispatcher ──
//
// Fire-and-report command execution. Failures are logged and folded
// into `false`; nothing is retried and nothing propagates.

use everhome_api::EverhomeClient;
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Sends device actions to the execute endpoint.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    client: EverhomeClient,
}

impl ActionDispatcher {
    pub fn new(client: EverhomeClient) -> Self {
        Self { client }
    }

    /// Execute `action` on `device_id`. Returns `true` only when the
    /// server answered 2xx.
    pub async fn execute(&self, device_id: &str, action: &str, params: &Map<String, Value>) -> bool {
        match self.client.execute_action(device_id, action, params).await {
            Ok(()) => {
                debug!(device_id, action, "action accepted");
                true
            }
            Err(e) => {
                error!(device_id, action, error = %e, "failed to execute device action");
                false
            }
        }
    }
}

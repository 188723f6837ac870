// ── Device domain types ──

use std::borrow::Borrow;
use std::fmt;

use everhome_api::{DeviceRecord, DeviceStates};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::Category;
use crate::error::CoreError;

// ── DeviceId ────────────────────────────────────────────────────────

/// Identifier of a device, as assigned by the Everhome cloud.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// Reported device state. Every field is `None` when the cloud omitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// `"on"`/`"off"` or `"up"`/`"down"`.
    pub general: Option<String>,
    /// `"open"`/`"closed"` for contact sensors.
    pub contact: Option<String>,
    /// Dimmer level on the device scale.
    pub brightness: Option<i64>,
    pub battery_flag: Option<String>,
    pub battery_percentage: Option<i64>,
}

impl From<DeviceStates> for DeviceState {
    fn from(s: DeviceStates) -> Self {
        Self {
            general: s.general,
            contact: s.state,
            brightness: s.brightness,
            battery_flag: s.batteryboolean,
            battery_percentage: s.batterypercentage,
        }
    }
}

/// A device from the current collection.
///
/// Built from a wire record that has an id. Nothing else is guaranteed;
/// projections in [`super::projection`] turn the raw fields into
/// tri-state readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub subtype: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub firmware_version: Option<String>,
    /// Raw cover position; may lie outside 0..=100.
    pub position: Option<i64>,
    pub capabilities: Vec<String>,
    pub state: DeviceState,
    /// Keys the wire record carried that are not modelled above.
    pub attributes: Map<String, Value>,
}

impl Device {
    /// Category of this device's subtype, if it is a supported one.
    pub fn category(&self) -> Option<Category> {
        self.subtype.as_deref().and_then(Category::from_subtype)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(record: DeviceRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::validation("device record has no id"))?;

        Ok(Self {
            id: DeviceId(id),
            subtype: record.subtype,
            name: record.name,
            model: record.model,
            firmware_version: record.firmware_version,
            position: record.position,
            capabilities: record.capabilities.unwrap_or_default(),
            state: record.states.map(DeviceState::from).unwrap_or_default(),
            attributes: record.extra,
        })
    }
}

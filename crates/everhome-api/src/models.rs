// Wire types for the Everhome device endpoints.
//
// The cloud returns loosely-shaped JSON: any key may be missing, numbers
// sometimes arrive as strings, and unknown keys appear per device family.
// Every recognized field is therefore optional and decoded leniently; a
// value of the wrong shape reads as absent instead of failing the whole
// device list. Unrecognized keys are kept in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One device as reported by `GET /device`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Classification tag, e.g. `"shutter"`, `"door"`, `"socket"`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Cover position, nominally 0 (closed) to 100 (open). Not clamped here.
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    #[serde(default, deserialize_with = "lenient_tags", skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_states", skip_serializing_if = "Option::is_none")]
    pub states: Option<DeviceStates>,

    /// Any keys not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The nested `states` object of a device record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStates {
    /// `"on"` / `"off"` for switches and lights, `"up"` / `"down"` for covers.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,

    /// `"open"` / `"closed"` for contact sensors.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Dimmer level on the device scale (0-100).
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,

    /// `"battery-low"` when the battery needs replacing.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub batteryboolean: Option<String>,

    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub batterypercentage: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Lenient field decoders ──────────────────────────────────────────

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(int_from_value(&value))
}

fn lenient_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_states<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DeviceStates>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Integer view of a JSON value. Fractions truncate toward zero.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn int_from_value(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    float.is_finite().then_some(float.trunc() as i64)
}

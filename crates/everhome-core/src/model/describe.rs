// ── Entity description ──
//
// Static presentation metadata for a device: stable unique id, display
// name, device class, icon, and the feature flags a UI needs before it
// renders controls.

use serde::Serialize;
use strum::{Display, EnumString};

use super::category::Category;
use super::device::Device;

pub const MANUFACTURER: &str = "Everhome";

const UNKNOWN_FIRMWARE: &str = "Unknown";

/// Presentation class of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    // Covers
    Garage,
    Blind,
    Awning,
    Shutter,
    // Switches
    Outlet,
    Switch,
    // Binary sensors
    Door,
    Window,
    Motion,
    Smoke,
    Moisture,
}

impl DeviceClass {
    pub fn for_subtype(subtype: &str) -> Option<Self> {
        Some(match subtype {
            "garage_door" => Self::Garage,
            "blind" | "curtain" => Self::Blind,
            "awning" => Self::Awning,
            "shutter" => Self::Shutter,
            "socket" => Self::Outlet,
            "watering" => Self::Switch,
            "door" => Self::Door,
            "window" => Self::Window,
            "motiondetector" => Self::Motion,
            "smokedetector" => Self::Smoke,
            "waterdetector" => Self::Moisture,
            _ => return None,
        })
    }
}

/// Metadata describing how a device is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescription {
    /// `everhome_{account}_{device}`; stable across restarts.
    pub unique_id: String,
    pub name: String,
    pub category: Category,
    pub device_class: Option<DeviceClass>,
    pub icon: Option<&'static str>,
    pub manufacturer: &'static str,
    pub model: String,
    pub firmware: String,
    pub supports_position: bool,
    pub supports_brightness: bool,
}

impl Device {
    /// Describe this device for `account_id`.
    ///
    /// Returns `None` when the subtype belongs to no supported category.
    pub fn describe(&self, account_id: &str) -> Option<EntityDescription> {
        let category = self.category()?;
        let subtype = self.subtype.as_deref().unwrap_or_default();

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{} {}", fallback_noun(category), self.id));

        let model = self.model.clone().unwrap_or_else(|| match category {
            Category::Light => "Light".to_owned(),
            _ => title_case(subtype),
        });

        Some(EntityDescription {
            unique_id: unique_id(account_id, self.id.as_str()),
            name,
            category,
            device_class: DeviceClass::for_subtype(subtype),
            icon: icon_for(subtype),
            manufacturer: MANUFACTURER,
            model,
            firmware: self
                .firmware_version
                .clone()
                .unwrap_or_else(|| UNKNOWN_FIRMWARE.to_owned()),
            supports_position: category == Category::Cover && self.position.is_some(),
            supports_brightness: category == Category::Light
                && (self.has_capability("set_brightness") || self.has_capability("brightness")),
        })
    }
}

pub fn unique_id(account_id: &str, device_id: &str) -> String {
    format!("everhome_{account_id}_{device_id}")
}

fn fallback_noun(category: Category) -> &'static str {
    match category {
        Category::Cover => "Cover",
        Category::Switch => "Switch",
        Category::Light => "Light",
        Category::BinarySensor => "Sensor",
    }
}

fn icon_for(subtype: &str) -> Option<&'static str> {
    match subtype {
        "garage_door" => Some("mdi:garage"),
        "blind" => Some("mdi:blinds"),
        "curtain" => Some("mdi:curtains"),
        "awning" => Some("mdi:awning-outline"),
        "shutter" => Some("mdi:window-shutter"),
        "watering" => Some("mdi:water"),
        _ => None,
    }
}

/// `"garage_door"` -> `"Garage Door"`.
fn title_case(subtype: &str) -> String {
    subtype
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, DeviceState};
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    fn device(id: &str, subtype: &str) -> Device {
        Device {
            id: DeviceId::from(id),
            subtype: Some(subtype.into()),
            name: None,
            model: None,
            firmware_version: None,
            position: None,
            capabilities: Vec::new(),
            state: DeviceState::default(),
            attributes: Map::new(),
        }
    }

    #[test]
    fn cover_fallbacks() {
        let desc = device("g1", "garage_door").describe("acct").unwrap();
        assert_eq!(
            desc,
            EntityDescription {
                unique_id: "everhome_acct_g1".into(),
                name: "Cover g1".into(),
                category: Category::Cover,
                device_class: Some(DeviceClass::Garage),
                icon: Some("mdi:garage"),
                manufacturer: "Everhome",
                model: "Garage Door".into(),
                firmware: "Unknown".into(),
                supports_position: false,
                supports_brightness: false,
            }
        );
    }

    #[test]
    fn reported_fields_win_over_fallbacks() {
        let mut d = device("s1", "shutter");
        d.name = Some("Bedroom".into());
        d.model = Some("Smart Shutter".into());
        d.firmware_version = Some("2.1.0".into());
        d.position = Some(30);

        let desc = d.describe("acct").unwrap();
        assert_eq!(desc.name, "Bedroom");
        assert_eq!(desc.model, "Smart Shutter");
        assert_eq!(desc.firmware, "2.1.0");
        assert!(desc.supports_position);
        assert_eq!(desc.icon, Some("mdi:window-shutter"));
    }

    #[test]
    fn curtain_is_blind_class_with_own_icon() {
        let desc = device("c1", "curtain").describe("a").unwrap();
        assert_eq!(desc.device_class, Some(DeviceClass::Blind));
        assert_eq!(desc.icon, Some("mdi:curtains"));
    }

    #[test]
    fn switch_and_sensor_classes() {
        let socket = device("p1", "socket").describe("a").unwrap();
        assert_eq!(socket.device_class, Some(DeviceClass::Outlet));
        assert_eq!(socket.icon, None);
        assert_eq!(socket.name, "Switch p1");

        let watering = device("w1", "watering").describe("a").unwrap();
        assert_eq!(watering.device_class, Some(DeviceClass::Switch));
        assert_eq!(watering.icon, Some("mdi:water"));

        let water = device("x1", "waterdetector").describe("a").unwrap();
        assert_eq!(water.device_class, Some(DeviceClass::Moisture));
        assert_eq!(water.name, "Sensor x1");
        assert_eq!(water.model, "Waterdetector");
    }

    #[test]
    fn light_brightness_support_from_capabilities() {
        let mut light = device("l1", "light");
        let plain = light.describe("a").unwrap();
        assert_eq!(plain.model, "Light");
        assert!(!plain.supports_brightness);
        assert_eq!(plain.device_class, None);

        light.capabilities = vec!["brightness".into()];
        assert!(light.describe("a").unwrap().supports_brightness);
    }

    #[test]
    fn unsupported_subtype_has_no_description() {
        assert!(device("t1", "thermostat").describe("a").is_none());
    }
}
